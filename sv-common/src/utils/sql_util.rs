pub struct SqlUtil {}

const PG_ESCAPE: char = '"';

impl SqlUtil {
    pub fn is_escaped(token: &str) -> bool {
        token.starts_with(PG_ESCAPE) && token.ends_with(PG_ESCAPE)
    }

    pub fn escape(token: &str) -> String {
        if !Self::is_escaped(token) {
            return format!(r#"{}{}{}"#, PG_ESCAPE, token, PG_ESCAPE);
        }
        token.to_string()
    }

    pub fn escape_cols(cols: &[String]) -> Vec<String> {
        let mut escaped_cols = Vec::new();
        for col in cols {
            escaped_cols.push(Self::escape(col));
        }
        escaped_cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(SqlUtil::escape("Order"), r#""Order""#);
        assert_eq!(SqlUtil::escape(r#""Order""#), r#""Order""#);
    }
}
