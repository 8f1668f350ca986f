/// Replace `${ENV_VAR}` placeholders in config text.
///
/// Unresolvable variables are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Replace `${ENV_VAR}` placeholders using a custom lookup function.
fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Unterminated placeholder: keep the remainder literally.
            result.push_str(&rest[start..]);
            return result;
        };
        let name = &after[..end];
        match lookup(name).filter(|_| !name.is_empty()) {
            Some(value) => result.push_str(&value),
            None => {
                result.push_str("${");
                result.push_str(name);
                result.push('}');
            },
        }
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    fn lookup(name: &str) -> Option<String> {
        match name {
            "COURIER_TEST_LIMIT" => Some("1500".to_string()),
            _ => None,
        }
    }

    #[rstest]
    #[case("max_length = ${COURIER_TEST_LIMIT}", "max_length = 1500")]
    #[case("${COURIER_MISSING_XYZ}", "${COURIER_MISSING_XYZ}")]
    #[case("${}", "${}")]
    #[case("tail ${COURIER_TEST_LIMIT", "tail ${COURIER_TEST_LIMIT")]
    #[case("plain text", "plain text")]
    fn substitution(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(substitute_env_with(input, lookup), expected);
    }
}
