//! Static voice and language registry.
//!
//! Maps each supported language code to the ordered list of voices the
//! synthesis engine accepts for it, and display names to language codes.
//! The first voice of every list is the fallback used when a sentence's
//! voice does not belong to its language.

use phf::phf_ordered_map;
use serde::Serialize;

/// A language known to the studio together with its voices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    /// Language code used in sentences (e.g. `en-us`)
    pub code: &'static str,
    /// Human-readable name shown by editors
    pub name: &'static str,
    /// Single-letter language code understood by Kokoro servers
    #[serde(skip)]
    pub engine_code: &'static str,
    /// Valid voices, in display order
    pub voices: &'static [&'static str],
}

/// Language code → language entry, in display order.
pub static LANGUAGES: phf::OrderedMap<&'static str, Language> = phf_ordered_map! {
    "en-us" => Language {
        code: "en-us",
        name: "American English",
        engine_code: "a",
        voices: &[
            "af_heart", "af_alloy", "af_aoede", "af_bella", "af_jessica", "af_kore",
            "af_nicole", "af_nova", "af_river", "af_sarah", "af_sky", "am_adam",
            "am_echo", "am_eric", "am_fenrir", "am_liam", "am_michael", "am_onyx",
            "am_puck", "am_santa",
        ],
    },
    "en-gb" => Language {
        code: "en-gb",
        name: "British English",
        engine_code: "b",
        voices: &[
            "bf_alice", "bf_emma", "bf_isabella", "bf_lily", "bm_daniel", "bm_fable",
            "bm_george", "bm_lewis",
        ],
    },
    "ja" => Language {
        code: "ja",
        name: "Japanese",
        engine_code: "j",
        voices: &["jf_alpha", "jf_gongitsune", "jf_nezumi", "jf_tebukuro", "jm_kumo"],
    },
    "zh" => Language {
        code: "zh",
        name: "Mandarin Chinese",
        engine_code: "z",
        voices: &[
            "zf_xiaobei", "zf_xiaoni", "zf_xiaoxiao", "zf_xiaoyi", "zm_yunjian", "zm_yunxi",
            "zm_yunxia", "zm_yunyang",
        ],
    },
    "es" => Language {
        code: "es",
        name: "Spanish",
        engine_code: "e",
        voices: &["ef_dora", "em_alex", "em_santa"],
    },
    "fr" => Language {
        code: "fr",
        name: "French",
        engine_code: "f",
        voices: &["ff_siwis"],
    },
    "hi" => Language {
        code: "hi",
        name: "Hindi",
        engine_code: "h",
        voices: &["hf_alpha", "hf_beta", "hm_omega", "hm_psi"],
    },
    "it" => Language {
        code: "it",
        name: "Italian",
        engine_code: "i",
        voices: &["if_sara", "im_nicola"],
    },
    "pt-br" => Language {
        code: "pt-br",
        name: "Brazilian Portuguese",
        engine_code: "p",
        voices: &["pf_dora", "pm_alex", "pm_santa"],
    },
};

/// Display name → language code.
pub static LANGUAGE_NAMES: phf::OrderedMap<&'static str, &'static str> = phf_ordered_map! {
    "American English" => "en-us",
    "British English" => "en-gb",
    "Japanese" => "ja",
    "Mandarin Chinese" => "zh",
    "Spanish" => "es",
    "French" => "fr",
    "Hindi" => "hi",
    "Italian" => "it",
    "Brazilian Portuguese" => "pt-br",
};

/// Look up a language by code.
#[inline]
pub fn language(code: &str) -> Option<&'static Language> {
    LANGUAGES.get(code)
}

/// All languages in display order.
pub fn languages() -> impl Iterator<Item = &'static Language> {
    LANGUAGES.values()
}

/// Voices for a language; empty for unknown codes.
pub fn voices_for_lang(code: &str) -> &'static [&'static str] {
    language(code).map(|lang| lang.voices).unwrap_or(&[])
}

/// Whether `voice` is listed for `code`.
pub fn is_valid_voice(code: &str, voice: &str) -> bool {
    voices_for_lang(code).contains(&voice)
}

/// Resolve a display name (e.g. "British English") to its code.
pub fn language_code(display_name: &str) -> Option<&'static str> {
    LANGUAGE_NAMES.get(display_name).copied()
}

/// Every registered voice, grouped by language in display order.
pub fn all_voices() -> Vec<&'static str> {
    languages().flat_map(|lang| lang.voices.iter().copied()).collect()
}
