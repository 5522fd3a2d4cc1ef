use log::{debug, warn};
use storytime_core::{settings::StartupOptions, speech::SpeechRate};
use url::{Url, form_urlencoded};

/// Start-up options from the first command-line argument, which may be a
/// full page URL or a bare query string.
pub(super) fn options_from_args<I>(args: I) -> StartupOptions
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .next()
        .map(|arg| parse_startup(&arg))
        .unwrap_or_default()
}

pub(super) fn parse_startup(input: &str) -> StartupOptions {
    match Url::parse(input) {
        Ok(url) => parse_query(url.query().unwrap_or_default()),
        Err(_) => parse_query(input.trim_start_matches('?')),
    }
}

fn parse_query(query: &str) -> StartupOptions {
    let mut options = StartupOptions::default();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "autoplay" | "readall" => options.auto_read_all = is_truthy(&value),
            "rate" => match value.parse::<f32>() {
                Ok(multiplier) if multiplier.is_finite() && multiplier > 0.0 => {
                    options.rate = Some(SpeechRate::from_multiplier(multiplier));
                }
                _ => warn!("startup: ignoring rate={:?}", value),
            },
            "panel" => match value.parse::<u16>() {
                Ok(panel) => options.start_panel = Some(panel),
                Err(_) => warn!("startup: ignoring panel={:?}", value),
            },
            other => debug!("startup: unknown key={:?}", other),
        }
    }

    options
}

fn is_truthy(value: &str) -> bool {
    value.is_empty()
        || value == "1"
        || value.eq_ignore_ascii_case("true")
        || value.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_url_query_is_parsed() {
        let options = parse_startup("https://example.org/story.html?autoplay=1&rate=1.2&panel=3");

        assert!(options.auto_read_all);
        assert_eq!(options.rate.map(SpeechRate::percent), Some(120));
        assert_eq!(options.start_panel, Some(3));
    }

    #[test]
    fn bare_query_and_truthy_forms() {
        assert!(parse_startup("?autoplay").auto_read_all);
        assert!(parse_startup("readall=yes").auto_read_all);
        assert!(parse_startup("autoplay=TRUE").auto_read_all);
        assert!(!parse_startup("autoplay=0").auto_read_all);
        assert!(!parse_startup("").auto_read_all);
    }

    #[test]
    fn rate_is_clamped_and_junk_ignored() {
        assert_eq!(parse_startup("rate=4").rate, Some(SpeechRate::MAX));
        assert_eq!(parse_startup("rate=0.1").rate, Some(SpeechRate::MIN));
        assert_eq!(parse_startup("rate=fast").rate, None);
        assert_eq!(parse_startup("rate=-1").rate, None);
        assert_eq!(parse_startup("panel=two&theme=dark"), StartupOptions::default());
    }

    #[test]
    fn missing_argument_means_defaults() {
        assert_eq!(options_from_args(Vec::new()), StartupOptions::default());
        assert_eq!(
            options_from_args(vec!["panel=5".to_owned(), "ignored".to_owned()]).start_panel,
            Some(5)
        );
    }
}
