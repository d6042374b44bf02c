//! # 管理API处理器

pub mod cron;
pub mod monitors;
pub mod system;

use crate::error::{MonitorError, Result};

/// 目标 ID 必须为正数
pub(crate) fn ensure_positive_id(id: i32, field: &str) -> Result<()> {
    if id > 0 {
        Ok(())
    } else {
        Err(MonitorError::validation_field(
            format!("{field} must be a positive integer, got {id}"),
            field,
        ))
    }
}

/// 解析查询参数中的目标 ID：缺失、非数字或非正数都返回校验错误
pub(crate) fn parse_target_id(raw: Option<&str>, field: &str) -> Result<i32> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| MonitorError::validation_field(format!("{field} is required"), field))?;
    let id = raw.parse::<i32>().map_err(|_| {
        MonitorError::validation_field(format!("{field} must be an integer, got {raw:?}"), field)
    })?;
    ensure_positive_id(id, field)?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("42"), Some(42))]
    #[case(Some(" 7 "), Some(7))]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("abc"), None)]
    #[case(Some("0"), None)]
    #[case(Some("-3"), None)]
    fn parses_query_ids(#[case] raw: Option<&str>, #[case] expected: Option<i32>) {
        let parsed = parse_target_id(raw, "job_id");
        match expected {
            Some(id) => assert_eq!(parsed.unwrap(), id),
            None => {
                let err = parsed.unwrap_err();
                assert_eq!(err.to_http_response_parts().1, "VALIDATION_ERROR");
            }
        }
    }
}
