// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;

pub mod net;
pub mod tls;

#[macro_export]
macro_rules! mailmirror_version {
    () => {
        env!("CARGO_PKG_VERSION")
    };
}

#[macro_export]
macro_rules! utc_now {
    () => {{
        use chrono::Utc;
        Utc::now().timestamp_millis()
    }};
}

#[macro_export]
macro_rules! raise_error {
    ($msg:expr, $code:expr) => {
        $crate::modules::error::MailMirrorError::Generic {
            message: $msg,
            location: snafu::location!(),
            code: $code,
        }
    };
}

#[macro_export]
macro_rules! decode_mailbox_name {
    ($name:expr) => {{
        utf7_imap::decode_utf7_imap($name.to_string())
    }};
}

#[macro_export]
macro_rules! encode_mailbox_name {
    ($name:expr) => {{
        utf7_imap::encode_utf7_imap($name.to_string())
    }};
}

#[macro_export]
macro_rules! current_datetime {
    () => {{
        use chrono::Local;
        let now = Local::now();
        now.format("%Y%m%d%H%M%S").to_string()
    }};
}

#[macro_export]
macro_rules! validate_email {
    ($email:expr) => {{
        $crate::modules::utils::validate_email($email)
    }};
}

pub fn validate_email(email: &str) -> crate::modules::error::MailMirrorResult<()> {
    use std::str::FromStr;
    let email_address = email_address::EmailAddress::from_str(email).map_err(|_| {
        raise_error!(
            format!("Invalid email format : {}", email),
            ErrorCode::InvalidParameter
        )
    })?;
    if email != email_address.email() {
        return Err(raise_error!(
            format!("Invalid email format: {}", email),
            ErrorCode::InvalidParameter
        ));
    }
    Ok(())
}

/// Compresses a list of UIDs into an IMAP sequence-set string.
///
/// `[1, 2, 3, 5, 6, 7, 15]` becomes `"1:3,5:7,15"`. The input is sorted
/// first; duplicates collapse into their range.
pub fn compress_uid_list(nums: Vec<u32>) -> String {
    if nums.is_empty() {
        return String::new();
    }

    let mut sorted_nums = nums;
    sorted_nums.sort();
    sorted_nums.dedup();

    let mut result = Vec::new();
    let mut current_range_start = sorted_nums[0];
    let mut current_range_end = sorted_nums[0];

    for &n in sorted_nums.iter().skip(1) {
        if n == current_range_end + 1 {
            current_range_end = n;
        } else {
            if current_range_start == current_range_end {
                result.push(current_range_start.to_string());
            } else {
                result.push(format!("{}:{}", current_range_start, current_range_end));
            }
            current_range_start = n;
            current_range_end = n;
        }
    }

    if current_range_start == current_range_end {
        result.push(current_range_start.to_string());
    } else {
        result.push(format!("{}:{}", current_range_start, current_range_end));
    }

    result.join(",")
}

/// Splits a deduplicated UID collection into sequence-set strings of at most
/// `chunk_size` UIDs each, so a single STORE/FETCH command line stays short.
pub fn generate_uid_sequence(unique_nums: Vec<u32>, chunk_size: usize) -> Vec<String> {
    use ahash::AHashSet;
    use itertools::Itertools;

    let set: AHashSet<u32> = unique_nums.into_iter().collect();
    let nums: Vec<u32> = set.into_iter().sorted().collect();
    if nums.is_empty() {
        return Vec::new();
    }

    let mut result = Vec::new();
    for chunk in nums.chunks(chunk_size) {
        let compressed = compress_uid_list(chunk.to_vec());
        result.push(compressed);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_uid_list() {
        assert_eq!(compress_uid_list(vec![]), "");
        assert_eq!(compress_uid_list(vec![4]), "4");
        assert_eq!(compress_uid_list(vec![1, 2, 3, 5, 6, 7, 15]), "1:3,5:7,15");
        assert_eq!(compress_uid_list(vec![7, 5, 6, 2, 3, 1]), "1:3,5:7");
        assert_eq!(compress_uid_list(vec![9, 9, 10]), "9:10");
    }

    #[test]
    fn test_generate_uid_sequence_chunks() {
        let chunks = generate_uid_sequence(vec![1, 2, 3, 5, 6, 7, 9, 10, 11, 15], 6);
        assert_eq!(chunks, vec!["1:3,5:7".to_string(), "9:11,15".to_string()]);
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("not-an-address").is_err());
        assert!(validate_email("").is_err());
    }
}
