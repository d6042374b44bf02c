//! # 停机时长格式化

use chrono::TimeDelta;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// 把停机时长格式化为 "最大非零单位 + 下一级单位"
///
/// 例如 125 秒 -> `2m 5s`，90000 秒 -> `1d 1h`，负数按 0 处理
#[must_use]
pub fn format_downtime(duration: TimeDelta) -> String {
    format_seconds(duration.num_seconds())
}

/// 按秒数格式化
#[must_use]
pub fn format_seconds(total: i64) -> String {
    let total = total.max(0);

    if total >= DAY {
        format!("{}d {}h", total / DAY, (total % DAY) / HOUR)
    } else if total >= HOUR {
        format!("{}h {}m", total / HOUR, (total % HOUR) / MINUTE)
    } else if total >= MINUTE {
        format!("{}m {}s", total / MINUTE, total % MINUTE)
    } else {
        format!("{total}s")
    }
}
