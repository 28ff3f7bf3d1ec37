// ============================================================================
// LocaleSync - 键路径编解码
// ============================================================================
//
// 文件: src/core/key_path.rs
// 职责: 点分隔键与路径段序列之间的互相转换
// 边界:
//   - ✅ 键拆分与拼接
//   - ✅ 键格式校验
//   - ❌ 不应做任何规范化（去空格、大小写转换）
//   - ❌ 不应包含树结构操作
//
// ============================================================================

use super::diagnostics::CodecError;

/// 键路径分隔符
pub const SEPARATOR: char = '.';

/// 拆分点分隔键
///
/// 空键或包含空段（开头/结尾/连续的 `.`）时返回 `MalformedKey`。
pub fn split(key: &str) -> Result<Vec<String>, CodecError> {
    if key.is_empty() {
        return Err(malformed(key));
    }

    let segments: Vec<String> = key.split(SEPARATOR).map(str::to_string).collect();
    if segments.iter().any(String::is_empty) {
        return Err(malformed(key));
    }

    Ok(segments)
}

/// 拼接路径段，`split` 的逆操作
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    let mut key = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            key.push(SEPARATOR);
        }
        key.push_str(segment.as_ref());
    }
    key
}

/// 键是否合法
pub fn is_valid(key: &str) -> bool {
    split(key).is_ok()
}

fn malformed(key: &str) -> CodecError {
    CodecError::MalformedKey {
        key: key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("greeting", &["greeting"])]
    #[case("greeting.hello", &["greeting", "hello"])]
    #[case("a.b.c.d", &["a", "b", "c", "d"])]
    #[case("Menu.File.Open", &["Menu", "File", "Open"])]
    #[case(" a . b ", &[" a ", " b "])]
    fn split_valid_keys(#[case] key: &str, #[case] expected: &[&str]) {
        let segments = split(key).unwrap();
        assert_eq!(segments, expected);
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case(".a")]
    #[case("a.")]
    #[case("a..b")]
    #[case("..")]
    fn split_rejects_malformed_keys(#[case] key: &str) {
        assert_eq!(
            split(key),
            Err(CodecError::MalformedKey {
                key: key.to_string()
            })
        );
    }

    #[rstest]
    #[case("greeting")]
    #[case("greeting.hello")]
    #[case("errors.http.404")]
    #[case("Xin chào.tạm biệt")]
    fn join_inverts_split(#[case] key: &str) {
        assert_eq!(join(&split(key).unwrap()), key);
    }

    #[test]
    fn segments_are_case_sensitive() {
        assert_ne!(split("Greeting.hello").unwrap(), split("greeting.hello").unwrap());
    }

    #[test]
    fn join_of_empty_sequence_is_empty() {
        let empty: [&str; 0] = [];
        assert_eq!(join(&empty), "");
        assert!(!is_valid(""));
    }
}
