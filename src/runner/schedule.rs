//! # Cron 表达式计算
//!
//! 基于 `cron` crate 计算下一次运行时间。五段式表达式补齐秒字段，
//! 星期字段的数字从 0-6（0=周日）换算为 `cron` crate 的 1-7（1=周日）

use std::str::FromStr;

use chrono::{NaiveDateTime, TimeDelta};
use cron::Schedule;

use crate::logging::{LogComponent, LogStage};
use crate::lwarn;

/// 把用户输入的表达式转换为 `cron` crate 接受的格式
#[must_use]
pub fn normalize_expression(expression: &str) -> String {
    let trimmed = expression.trim();
    if trimmed.starts_with('@') {
        return trimmed.to_string();
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    if fields.len() != 5 {
        return fields.join(" ");
    }

    format!(
        "0 {} {} {} {} {}",
        fields[0],
        fields[1],
        fields[2],
        fields[3],
        shift_day_of_week(fields[4])
    )
}

/// 星期字段逐项换算，步长保持不变，7 视为周日
fn shift_day_of_week(field: &str) -> String {
    field.split(',').map(shift_day_item).collect::<Vec<_>>().join(",")
}

fn shift_day_item(item: &str) -> String {
    let (base, step) = match item.split_once('/') {
        Some((base, step)) => (base, Some(step)),
        None => (item, None),
    };
    let shifted = match base.split_once('-') {
        Some((start, end)) => match (parse_day(start), parse_day(end)) {
            (Some(start), Some(7)) => return shift_range_to_sunday(start, step),
            _ => format!("{}-{}", shift_day(start), shift_day(end)),
        },
        None => shift_day(base),
    };
    match step {
        Some(step) => format!("{shifted}/{step}"),
        None => shifted,
    }
}

fn parse_day(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|day| *day <= 7)
}

fn shift_day(value: &str) -> String {
    parse_day(value).map_or_else(|| value.to_string(), |day| (day % 7 + 1).to_string())
}

/// 以 7 结尾的区间：周日换算成 1 后会变成降序区间，需要拆开
fn shift_range_to_sunday(start: u32, step: Option<&str>) -> String {
    match (start, step) {
        (0, None) => "1-7".to_string(),
        (0, Some(step)) => format!("1-7/{step}"),
        (7, _) => "1".to_string(),
        (start, None) => format!("{}-7,1", start + 1),
        (start, Some(step)) => match step.parse::<usize>() {
            Ok(step) if step > 0 => {
                let mut days: Vec<u32> = (start..=7).step_by(step).map(|day| day % 7 + 1).collect();
                days.sort_unstable();
                days.dedup();
                days.iter().map(u32::to_string).collect::<Vec<_>>().join(",")
            }
            // 步长非法时原样保留，交给 cron 解析报错
            _ => format!("{start}-7/{step}"),
        },
    }
}

/// 解析表达式并计算 `after` 之后的下一次运行时间
pub fn next_run_after(
    expression: &str,
    after: NaiveDateTime,
) -> Result<NaiveDateTime, cron::error::Error> {
    let schedule = Schedule::from_str(&normalize_expression(expression))?;
    let after = after.and_utc();
    Ok(schedule
        .after(&after)
        .next()
        .map_or_else(|| fallback(after.naive_utc()), |next| next.naive_utc()))
}

/// 计算下一次运行时间，表达式无效时退回一分钟后
#[must_use]
pub fn compute_next_run(expression: &str, now: NaiveDateTime) -> NaiveDateTime {
    match next_run_after(expression, now) {
        Ok(next) => next,
        Err(e) => {
            lwarn!(
                "runner",
                LogStage::Scheduling,
                LogComponent::CronRunner,
                "invalid_cron_expression",
                &format!("无法解析 cron 表达式，退回一分钟后执行: {e}"),
                expression = %expression
            );
            fallback(now)
        }
    }
}

fn fallback(now: NaiveDateTime) -> NaiveDateTime {
    now + TimeDelta::minutes(1)
}
