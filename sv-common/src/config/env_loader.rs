use std::{any::type_name, env, fmt::Debug, str::FromStr};

use anyhow::bail;

use crate::error::Error;

pub struct EnvLoader {}

impl EnvLoader {
    pub fn get_required<T>(key: &str) -> anyhow::Result<T>
    where
        T: FromStr,
    {
        match env::var(key) {
            Ok(value) if !value.is_empty() => Self::parse_value(key, &value),
            _ => bail! {Error::ConfigError(format!(
                "environment variable {} is not set",
                key
            ))},
        }
    }

    pub fn get_with_default<T>(key: &str, default: T) -> anyhow::Result<T>
    where
        T: FromStr,
        <T as FromStr>::Err: Debug,
    {
        if let Ok(value) = env::var(key) {
            if !value.is_empty() {
                return Self::parse_value(key, &value);
            }
        }
        Ok(default)
    }

    fn parse_value<T>(key: &str, value: &str) -> anyhow::Result<T>
    where
        T: FromStr,
    {
        match value.parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => bail! {Error::ConfigError(format!(
                "environment variable {}={}, can not be parsed as {}",
                key,
                value,
                type_name::<T>(),
            ))},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_with_default() {
        env::remove_var("SV_TEST_MISSING");
        let batch_size: usize = EnvLoader::get_with_default("SV_TEST_MISSING", 100).unwrap();
        assert_eq!(batch_size, 100);

        env::set_var("SV_TEST_PRESENT", "250");
        let batch_size: usize = EnvLoader::get_with_default("SV_TEST_PRESENT", 100).unwrap();
        assert_eq!(batch_size, 250);
        env::remove_var("SV_TEST_PRESENT");
    }

    #[test]
    fn test_get_required_missing() {
        env::remove_var("SV_TEST_REQUIRED");
        assert!(EnvLoader::get_required::<String>("SV_TEST_REQUIRED").is_err());
    }

    #[test]
    fn test_parse_failure() {
        env::set_var("SV_TEST_BAD_USIZE", "not-a-number");
        assert!(EnvLoader::get_with_default::<usize>("SV_TEST_BAD_USIZE", 1).is_err());
        env::remove_var("SV_TEST_BAD_USIZE");
    }
}
