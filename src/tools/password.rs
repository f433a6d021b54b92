//! Password Strength & Generator
//!
//! Additive score over character-class presence and length thresholds; a
//! denylisted password scores zero. Crack time assumes a brute-force
//! attacker: `charset^len / (2 · guess_rate)` seconds.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    CHARSET_DIGITS, CHARSET_LOWERCASE, CHARSET_SYMBOLS, CHARSET_UPPERCASE, COMMON_PASSWORD_SET,
    PASSWORD_GUESS_RATE,
};

pub const MIN_GENERATED_LENGTH: usize = 4;
pub const MAX_GENERATED_LENGTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrengthLevel {
    VeryWeak,
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl StrengthLevel {
    fn from_score(score: u8) -> Self {
        match score {
            0..=19 => Self::VeryWeak,
            20..=39 => Self::Weak,
            40..=59 => Self::Medium,
            60..=79 => Self::Strong,
            _ => Self::VeryStrong,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryWeak => "Very Weak",
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
            Self::VeryStrong => "Very Strong",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordStrength {
    /// 0-100
    pub score: u8,
    pub level: StrengthLevel,
    pub label: String,
    pub charset_size: u32,
    pub entropy_bits: f64,
    pub crack_time_seconds: f64,
    pub crack_time_display: String,
    pub is_common: bool,
    pub suggestions: Vec<String>,
}

/// Score a password
pub fn analyze(password: &str) -> PasswordStrength {
    let length = password.chars().count();
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());
    let is_common = COMMON_PASSWORD_SET.contains(password.to_lowercase().as_str());

    let mut score: u32 = 0;
    let mut suggestions = Vec::new();

    for (present, points, hint) in [
        (has_lower, 10, "Add lowercase letters"),
        (has_upper, 15, "Add uppercase letters"),
        (has_digit, 15, "Add numbers"),
        (has_symbol, 20, "Add symbols"),
    ] {
        if present {
            score += points;
        } else {
            suggestions.push(hint.to_string());
        }
    }

    if length >= 8 {
        score += 10;
    } else {
        suggestions.push("Use at least 8 characters".to_string());
    }
    if length >= 12 {
        score += 15;
    }
    if length >= 16 {
        score += 15;
    }

    if is_common {
        score = 0;
        suggestions.insert(0, "This is a commonly used password".to_string());
    }

    let score = score.min(100) as u8;

    let charset_size = [
        (has_lower, 26u32),
        (has_upper, 26),
        (has_digit, 10),
        (has_symbol, 32),
    ]
    .iter()
    .filter(|(present, _)| *present)
    .map(|(_, size)| size)
    .sum::<u32>();

    let (entropy_bits, crack_time_seconds) = if is_common || charset_size == 0 {
        (0.0, 0.0)
    } else {
        let bits = length as f64 * (charset_size as f64).log2();
        (bits, crack_time(charset_size, length))
    };

    let level = StrengthLevel::from_score(score);

    PasswordStrength {
        score,
        level,
        label: level.as_str().to_string(),
        charset_size,
        entropy_bits,
        crack_time_seconds,
        crack_time_display: format_duration(crack_time_seconds),
        is_common,
        suggestions,
    }
}

/// Average brute-force time: half the keyspace at `PASSWORD_GUESS_RATE`
pub fn crack_time(charset_size: u32, length: usize) -> f64 {
    let combinations = (charset_size as f64).powf(length as f64);
    combinations / (2.0 * PASSWORD_GUESS_RATE)
}

/// Render seconds the way a person would say them
pub fn format_duration(seconds: f64) -> String {
    const MINUTE: f64 = 60.0;
    const HOUR: f64 = 3600.0;
    const DAY: f64 = 86_400.0;
    const YEAR: f64 = 31_536_000.0;

    if !seconds.is_finite() || seconds >= YEAR * 1e6 {
        return "millions of years".to_string();
    }
    if seconds < 1.0 {
        return "instantly".to_string();
    }

    let (value, unit) = if seconds < MINUTE {
        (seconds, "second")
    } else if seconds < HOUR {
        (seconds / MINUTE, "minute")
    } else if seconds < DAY {
        (seconds / HOUR, "hour")
    } else if seconds < YEAR {
        (seconds / DAY, "day")
    } else {
        (seconds / YEAR, "year")
    };

    let rounded = value.round() as u64;
    if rounded == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", rounded, unit)
    }
}

/// Character classes for the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    pub length: usize,
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: 16,
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: true,
        }
    }
}

/// Random password containing at least one character of every enabled class
pub fn generate<R: Rng>(options: &GeneratorOptions, rng: &mut R) -> AppResult<String> {
    if !(MIN_GENERATED_LENGTH..=MAX_GENERATED_LENGTH).contains(&options.length) {
        return Err(AppError::invalid_input(format!(
            "Length must be between {} and {}",
            MIN_GENERATED_LENGTH, MAX_GENERATED_LENGTH
        )));
    }

    let classes: Vec<Vec<char>> = [
        (options.lowercase, CHARSET_LOWERCASE),
        (options.uppercase, CHARSET_UPPERCASE),
        (options.digits, CHARSET_DIGITS),
        (options.symbols, CHARSET_SYMBOLS),
    ]
    .iter()
    .filter(|(enabled, _)| *enabled)
    .map(|(_, set)| set.chars().collect())
    .collect();

    if classes.is_empty() {
        return Err(AppError::invalid_input("Enable at least one character class"));
    }

    let pool: Vec<char> = classes.iter().flatten().copied().collect();
    let mut chars: Vec<char> = Vec::with_capacity(options.length);

    for class in &classes {
        if let Some(c) = class.choose(rng) {
            chars.push(*c);
        }
    }
    while chars.len() < options.length {
        chars.push(pool[rng.gen_range(0..pool.len())]);
    }
    chars.shuffle(rng);

    Ok(chars.into_iter().collect())
}
