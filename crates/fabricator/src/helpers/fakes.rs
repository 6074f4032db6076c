//! Locale-aware fake-value generation.
//!
//! The `i18n_fake` helper looks up a named generator for a locale and draws
//! from per-language word pools. Locale strings accept both `fr_FR` and
//! `fr-FR` spellings; unrecognized languages fall back to English, but a
//! string that is not a locale at all is an error.

use icu_locale_core::Locale;
use rand::Rng;

use crate::eval::{EvalContext, HelperError, compute_suggestions};
use crate::types::Value;

/// Languages with their own word pools.
const SUPPORTED_LANGUAGES: &[&str] = &["de", "en", "fr", "ja"];

/// Generator names `i18n_fake` understands.
pub const FAKE_KINDS: &[&str] = &["city", "company", "email", "first_name", "last_name", "name"];

/// The `i18n_fake` helper: generate a locale-appropriate fake value.
pub fn i18n_fake(
    ctx: &mut EvalContext,
    locale: &Value,
    fake_kind: &Value,
) -> Result<Value, HelperError> {
    let faker = LocaleFaker::for_locale(&locale.to_string())?;
    faker.generate(&fake_kind.to_string(), ctx)
}

/// A fake-value generator bound to one language's word pools.
pub struct LocaleFaker {
    language: &'static str,
    data: &'static LocaleData,
}

impl LocaleFaker {
    /// Build a faker for a locale string such as `"fr_FR"`, `"de"`, or
    /// `"ja-JP"`.
    pub fn for_locale(locale: &str) -> Result<Self, HelperError> {
        let language = normalize_locale(locale)?;
        Ok(Self { language, data: data_for(language) })
    }

    /// The normalized language this faker draws from.
    pub fn language(&self) -> &'static str {
        self.language
    }

    /// Run the named generator, drawing randomness from the context.
    pub fn generate(&self, kind: &str, ctx: &mut EvalContext) -> Result<Value, HelperError> {
        let data = self.data;
        let rng = ctx.rng_mut();
        let value = match kind {
            "first_name" => pick(rng, data.first_names).to_string(),
            "last_name" => pick(rng, data.last_names).to_string(),
            "name" => {
                format!("{} {}", pick(rng, data.first_names), pick(rng, data.last_names))
            }
            "city" => pick(rng, data.cities).to_string(),
            "company" => pick(rng, data.companies).to_string(),
            "email" => {
                let first = pick(rng, data.first_names).to_lowercase();
                let last = pick(rng, data.last_names).to_lowercase();
                let domain = pick(rng, data.email_domains);
                format!("{first}.{last}@{domain}")
            }
            unknown => {
                return Err(HelperError::UnknownFakeKind {
                    kind: unknown.to_string(),
                    suggestions: compute_suggestions(unknown, FAKE_KINDS),
                });
            }
        };
        Ok(Value::String(value))
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

/// Parse and normalize a locale string to a supported language code.
///
/// Unsupported but valid languages fall back to `"en"`; a syntactically
/// invalid locale string is a data error.
fn normalize_locale(locale: &str) -> Result<&'static str, HelperError> {
    let bcp47 = locale.replace('_', "-");
    let parsed = Locale::try_from_str(&bcp47)
        .map_err(|_| HelperError::InvalidLocale { locale: locale.to_string() })?;
    let language = parsed.id.language;
    Ok(SUPPORTED_LANGUAGES
        .iter()
        .find(|&&code| code == language.as_str())
        .copied()
        .unwrap_or("en"))
}

fn data_for(language: &str) -> &'static LocaleData {
    match language {
        "de" => &DE,
        "fr" => &FR,
        "ja" => &JA,
        _ => &EN,
    }
}

struct LocaleData {
    first_names: &'static [&'static str],
    last_names: &'static [&'static str],
    cities: &'static [&'static str],
    companies: &'static [&'static str],
    email_domains: &'static [&'static str],
}

static EN: LocaleData = LocaleData {
    first_names: &["Alice", "Brian", "Carmen", "Derek", "Elena", "Frank", "Grace", "Hector"],
    last_names: &["Anderson", "Brooks", "Chen", "Douglas", "Evans", "Foster", "Grant", "Hughes"],
    cities: &["Austin", "Boston", "Chicago", "Denver", "Portland", "Seattle"],
    companies: &["Acme Corp", "Globex", "Initech", "Umbrella Holdings", "Vandelay Industries"],
    email_domains: &["example.com", "example.org", "mail.test"],
};

static DE: LocaleData = LocaleData {
    first_names: &["Anna", "Bernd", "Claudia", "Dieter", "Elke", "Felix", "Greta", "Heinz"],
    last_names: &["Bauer", "Fischer", "Hoffmann", "Müller", "Schmidt", "Wagner", "Weber"],
    cities: &["Berlin", "Dresden", "Frankfurt", "Hamburg", "Köln", "München"],
    companies: &["Müller GmbH", "Nordwind AG", "Schmidt & Söhne", "Technik Haus"],
    email_domains: &["beispiel.de", "post.test"],
};

static FR: LocaleData = LocaleData {
    first_names: &["Amélie", "Bastien", "Camille", "Dominique", "Élodie", "François", "Hélène"],
    last_names: &["Bernard", "Dubois", "Laurent", "Lefebvre", "Martin", "Moreau", "Rousseau"],
    cities: &["Bordeaux", "Lille", "Lyon", "Marseille", "Nantes", "Paris", "Toulouse"],
    companies: &["Atelier Lumière", "Boulangerie Centrale", "Maison Dubois", "Société Générique"],
    email_domains: &["exemple.fr", "courriel.test"],
};

static JA: LocaleData = LocaleData {
    first_names: &["Aiko", "Daichi", "Haruto", "Kaori", "Ren", "Sakura", "Yuki"],
    last_names: &["Kobayashi", "Nakamura", "Sato", "Suzuki", "Takahashi", "Tanaka", "Watanabe"],
    cities: &["Fukuoka", "Kyoto", "Nagoya", "Osaka", "Sapporo", "Tokyo", "Yokohama"],
    companies: &["Fuji Denki", "Sakura Shoji", "Yamato Kogyo"],
    email_domains: &["example.jp", "mail.example.jp"],
};
