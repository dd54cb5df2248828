/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Hours to milliseconds, for reservation durations
pub const fn hours_to_millis(hours: i64) -> i64 {
    hours * 60 * 60 * 1000
}
