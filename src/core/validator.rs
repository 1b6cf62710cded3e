use crate::domain::model::{
    FieldErrors, RegistrationSubmission, ValidRegistration, FIELD_EMAIL, FIELD_PASSWORD,
    FIELD_PASSWORD_CONFIRM, FIELD_USERNAME,
};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use validator::ValidateEmail;

pub const MSG_REQUIRED: &str = "required";
pub const MSG_TOO_LONG: &str = "must be less than 64 characters long";
pub const MSG_PASSWORD_TOO_SHORT: &str = "must be at least 8 characters long";
pub const MSG_INVALID_EMAIL: &str = "must be a valid email address";
pub const MSG_PASSWORD_MISMATCH: &str = "password and confirm password must match";

const MAX_FIELD_LENGTH: usize = 64;

// 網域至少一個點，頂級網域 2 個字母以上
static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_+,\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("email pattern is valid")
});

/// 比 `validator` 更嚴格：不接受裸主機名、IP、單字母頂級網域與連續的點
fn is_valid_email(value: &str) -> bool {
    !value.starts_with('.')
        && !value.contains("..")
        && EMAIL_SHAPE.is_match(value)
        && value.to_string().validate_email()
}

/// 表單驗證失敗，攜帶每個欄位的錯誤訊息
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("registration form has {} invalid field(s)", .errors.len())]
pub struct ValidationError {
    errors: FieldErrors,
}

impl ValidationError {
    pub fn field_errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn into_field_errors(self) -> FieldErrors {
        self.errors
    }
}

struct FieldRule {
    name: &'static str,
    min: usize,
    min_message: &'static str,
    trim: bool,
    email: bool,
}

const EMAIL_RULE: FieldRule = FieldRule {
    name: FIELD_EMAIL,
    min: 1,
    min_message: MSG_REQUIRED,
    trim: false,
    email: true,
};

const USERNAME_RULE: FieldRule = FieldRule {
    name: FIELD_USERNAME,
    min: 1,
    min_message: MSG_REQUIRED,
    trim: true,
    email: false,
};

const PASSWORD_RULE: FieldRule = FieldRule {
    name: FIELD_PASSWORD,
    min: 8,
    min_message: MSG_PASSWORD_TOO_SHORT,
    trim: true,
    email: false,
};

const PASSWORD_CONFIRM_RULE: FieldRule = FieldRule {
    name: FIELD_PASSWORD_CONFIRM,
    min: 8,
    min_message: MSG_PASSWORD_TOO_SHORT,
    trim: true,
    email: false,
};

impl FieldRule {
    /// 依序執行長度與格式檢查，錯誤累加；回傳正規化後的值
    fn check(&self, value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
        let Some(value) = value else {
            errors.add(self.name, MSG_REQUIRED);
            return None;
        };

        // 長度以送出的原始值計算，trim 只影響輸出
        let length = value.chars().count();
        if length < self.min {
            errors.add(self.name, self.min_message);
        }
        if length > MAX_FIELD_LENGTH {
            errors.add(self.name, MSG_TOO_LONG);
        }
        if self.email && !is_valid_email(value) {
            errors.add(self.name, MSG_INVALID_EMAIL);
        }

        let normalized = if self.trim { value.trim() } else { value };
        Some(normalized.to_string())
    }
}

/// 驗證註冊表單；純函式，相同輸入永遠得到相同結果
pub fn validate_registration(
    submission: &RegistrationSubmission,
) -> Result<ValidRegistration, ValidationError> {
    let mut errors = FieldErrors::new();

    let email = EMAIL_RULE.check(submission.email.as_deref(), &mut errors);
    let username = USERNAME_RULE.check(submission.username.as_deref(), &mut errors);
    let password = PASSWORD_RULE.check(submission.password.as_deref(), &mut errors);
    let password_confirm =
        PASSWORD_CONFIRM_RULE.check(submission.password_confirm.as_deref(), &mut errors);

    // 四個欄位都有值時才做跨欄位比對
    let (Some(email), Some(username), Some(password), Some(password_confirm)) =
        (email, username, password, password_confirm)
    else {
        return Err(ValidationError { errors });
    };

    if password != password_confirm {
        errors.add(FIELD_PASSWORD, MSG_PASSWORD_MISMATCH);
        errors.add(FIELD_PASSWORD_CONFIRM, MSG_PASSWORD_MISMATCH);
    }

    if !errors.is_empty() {
        return Err(ValidationError { errors });
    }

    Ok(ValidRegistration {
        email,
        username,
        password,
        password_confirm,
    })
}
