use cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};

use crate::config::cookie_conf::MAX_COOKIE_AGE_DAYS;
use crate::config::CookieConfig;

/// `Set-Cookie` value carrying the login token: HTTP-only, site-wide,
/// expiring `max_age_days` from now. The lifetime is clamped to
/// `1..=MAX_COOKIE_AGE_DAYS` days.
pub fn build_token_cookie(config: &CookieConfig, token: &str) -> String {
    let max_age = Duration::days(config.max_age_days.clamp(1, MAX_COOKIE_AGE_DAYS));
    let mut builder = Cookie::build((config.name.clone(), token.to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .expires(OffsetDateTime::now_utc() + max_age);

    if config.secure {
        builder = builder.secure(true);
    }

    builder.build().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_cookie_is_http_only_with_seven_day_lifetime() {
        let header = build_token_cookie(&CookieConfig::default(), "abc.def.ghi");
        let parsed = Cookie::parse(header).unwrap();
        assert_eq!(parsed.name(), "token");
        assert_eq!(parsed.value(), "abc.def.ghi");
        assert_eq!(parsed.http_only(), Some(true));
        assert_eq!(parsed.max_age(), Some(Duration::days(7)));
        assert!(parsed.expires_datetime().unwrap() > OffsetDateTime::now_utc() + Duration::days(6));
        assert_eq!(parsed.secure(), None);
    }

    #[test]
    fn test_secure_flag_follows_config() {
        let config = CookieConfig { secure: true, ..CookieConfig::default() };
        let parsed = Cookie::parse(build_token_cookie(&config, "t")).unwrap();
        assert_eq!(parsed.secure(), Some(true));
    }

    #[test]
    fn test_out_of_range_lifetime_is_clamped() {
        let config = CookieConfig { max_age_days: 1_000_000_000_000_000, ..CookieConfig::default() };
        let parsed = Cookie::parse(build_token_cookie(&config, "t")).unwrap();
        assert_eq!(parsed.max_age(), Some(Duration::days(MAX_COOKIE_AGE_DAYS)));
    }
}
