use crate::common::error::ZtpError;

/// ztpboot全体で使用するResult型のエイリアス
///
/// # Examples
///
/// ```
/// use ztpboot::common::result::ZtpResult;
/// use ztpboot::common::error::ZtpError;
///
/// fn example_function() -> ZtpResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> ZtpResult<()> {
///     Err(ZtpError::config_error("Something went wrong"))
/// }
/// ```
pub type ZtpResult<T> = Result<T, ZtpError>;

/// Optionのエラー変換ヘルパー
pub trait OptionExt<T> {
    /// Option値をValidationErrorに変換する
    ///
    /// # Examples
    ///
    /// ```
    /// use ztpboot::common::result::{ZtpResult, OptionExt};
    ///
    /// let none_value: Option<String> = None;
    /// let result: ZtpResult<String> = none_value.ok_or_validation_error("field", "required");
    /// assert!(result.is_err());
    /// ```
    fn ok_or_validation_error(
        self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> ZtpResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_validation_error(
        self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> ZtpResult<T> {
        self.ok_or_else(|| ZtpError::validation_error(field, message, None))
    }
}

/// Resultのエラー変換ヘルパー
pub trait ResultExt<T, E> {
    /// ファイルシステムエラーとしてZtpResultに変換
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> ZtpResult<T>
    where
        E: Into<std::io::Error>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> ZtpResult<T>
    where
        E: Into<std::io::Error>,
    {
        self.map_err(|e| {
            let io_error = e.into();
            ZtpError::filesystem_error_with_source(message, path, io_error)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_option_ext_ok_or_validation_error() {
        let none_value: Option<String> = None;
        let result = none_value.ok_or_validation_error("field", "required");

        if let Err(ZtpError::ValidationError { field, message, .. }) = result {
            assert_eq!(field, "field");
            assert_eq!(message, "required");
        } else {
            panic!("Expected ValidationError");
        }
    }

    #[test]
    fn test_result_ext_with_filesystem_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let result: Result<String, std::io::Error> = Err(io_error);
        let path = Some(PathBuf::from("/test/path"));

        let converted = result.with_filesystem_error("test operation", path.clone());
        if let Err(ZtpError::FileSystemError { path: p, .. }) = converted {
            assert_eq!(p, path);
        } else {
            panic!("Expected FileSystemError");
        }
    }
}
