pub mod password;
pub mod slug;

pub use slug::slugify;

/// 生成大写字母与数字组成的随机码（推广码、联盟码后缀）
pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    let chars = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// Trim, and turn blank strings into `None`
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
