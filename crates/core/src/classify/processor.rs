//! Processor classifier.
//!
//! Pipeline: cleanup, brand detection, brand-specific family/model grammar,
//! generation inference, clock-speed extraction, architecture-suffix
//! decoding, label assembly. Detection is a data-driven list of
//! (pattern, outcome) rules evaluated in priority order, so precedence is
//! testable in isolation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Brand, Classification, ClassifiedProcessor};

use super::{collapse_whitespace, normalize_for_match, parse_number};

/// Family/model/variant details produced by the brand-specific grammars.
#[derive(Debug, Default, Clone)]
struct FamilyInfo {
    family: String,
    model_number: Option<String>,
    extra_info: Option<String>,
    /// Structural generation (e.g. Xeon "v3", Snapdragon "Gen 2") that takes
    /// priority over model-number inference.
    generation: Option<String>,
}

impl FamilyInfo {
    fn unknown() -> Self {
        Self { family: "Unknown".to_string(), ..Self::default() }
    }

    fn named(family: impl Into<String>) -> Self {
        Self { family: family.into(), ..Self::default() }
    }
}

// ---------------------------------------------------------------------------
// Cleanup
// ---------------------------------------------------------------------------

/// Filler tokens that carry no classification signal: marketing words,
/// core-count phrases, trademark leftovers.
static FILLER_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:procesador|processor|cpu|chip|with)\b",
        r"(?i)\b(?:dual|quad|octa|hexa)[- ]?core\b",
        r"(?i)\b(?:dual|quad)\b",
        r"(?i)\b\d+\s*(?:cores?|n[uú]cleos)\b",
        r"(?i)®|™|\(r\)|\(tm\)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("filler regex"))
    .collect()
});

fn clean_processor_text(text: &str) -> String {
    let mut cleaned = normalize_for_match(text);
    for re in FILLER_RES.iter() {
        cleaned = re.replace_all(&cleaned, " ").into_owned();
    }
    collapse_whitespace(&cleaned)
}

// ---------------------------------------------------------------------------
// Brand detection
// ---------------------------------------------------------------------------

/// Direct brand mentions, tried in order.
static BRAND_RULES: Lazy<Vec<(Regex, Brand)>> = Lazy::new(|| {
    [
        (r"(?i)\bintel\b", Brand::Intel),
        (r"(?i)\bamd\b", Brand::Amd),
        (r"(?i)\bqualcomm\b", Brand::Qualcomm),
        (r"(?i)\bapple\b", Brand::Apple),
        (r"(?i)\bsamsung\b", Brand::Samsung),
        (r"(?i)\barm\b", Brand::Arm),
    ]
    .iter()
    .map(|(p, b)| (Regex::new(p).expect("brand regex"), *b))
    .collect()
});

/// Family-distinctive tokens used when no brand word appears
/// ("core i5" implies Intel, "ryzen" implies AMD).
static BRAND_INFERENCE_RULES: Lazy<Vec<(Regex, Brand)>> = Lazy::new(|| {
    [
        (r"(?i)\bcore\s*i[3579]\b|\bi[3579][- ]\d{3,5}", Brand::Intel),
        (r"(?i)\b(?:xeon|celeron|pentium|atom)\b", Brand::Intel),
        (r"(?i)\b(?:ryzen|threadripper|epyc|athlon|phenom|sempron)\b", Brand::Amd),
        (r"(?i)\bfx[- ]?\d{4}\b", Brand::Amd),
        (r"(?i)\ba(?:4|6|8|10|12)[- ]?\d{3,4}\b", Brand::Amd),
        (r"(?i)\bsnapdragon\b", Brand::Qualcomm),
        (r"(?i)\bm[123]\b", Brand::Apple),
        (r"(?i)\ba\d{1,2}\s+bionic\b", Brand::Apple),
        (r"(?i)\bcortex\b|\bmediatek\b", Brand::Arm),
        (r"(?i)\bexynos\b", Brand::Samsung),
    ]
    .iter()
    .map(|(p, b)| (Regex::new(p).expect("brand inference regex"), *b))
    .collect()
});

fn detect_brand(cleaned: &str) -> Brand {
    for (re, brand) in BRAND_RULES.iter() {
        if re.is_match(cleaned) {
            return *brand;
        }
    }
    for (re, brand) in BRAND_INFERENCE_RULES.iter() {
        if re.is_match(cleaned) {
            return *brand;
        }
    }
    Brand::Other
}

// ---------------------------------------------------------------------------
// Intel grammar
// ---------------------------------------------------------------------------

static INTEL_CORE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:core\s*)?i([3579])[\s-]*(\d{3,5}[a-z]{0,2})?\b").expect("intel core regex")
});

static XEON_METAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(gold|silver|bronze|platinum)\b[\s-]*(\d{4}[a-z]?)?").expect("xeon metal regex")
});

static XEON_E_V_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\be([57])[- ]?(\d{4}[a-z]?)\b(?:\s*v(\d))?").expect("xeon e regex")
});

static XEON_E_DASH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\be-(\d{4}[a-z]{0,2})\b").expect("xeon e-dash regex"));

static INTEL_SMALL_MODEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([a-z]\d{3,5}[a-z]{0,2})\b").expect("intel small model regex"));

fn detect_intel_family(cleaned: &str) -> FamilyInfo {
    if let Some(caps) = INTEL_CORE_RE.captures(cleaned) {
        let mut info = FamilyInfo::named(format!("Core i{}", &caps[1]));
        info.model_number = caps.get(2).map(|m| m.as_str().to_uppercase());
        return info;
    }
    if cleaned.contains("xeon") {
        let mut info = FamilyInfo::named("Xeon");
        if let Some(caps) = XEON_METAL_RE.captures(cleaned) {
            let metal = &caps[1];
            info.extra_info =
                Some(format!("{}{}", metal[..1].to_uppercase(), metal[1..].to_lowercase()));
            info.model_number = caps.get(2).map(|m| m.as_str().to_string());
        } else if let Some(caps) = XEON_E_DASH_RE.captures(cleaned) {
            info.model_number = Some(format!("E-{}", caps[1].to_uppercase()));
        } else if let Some(caps) = XEON_E_V_RE.captures(cleaned) {
            info.model_number = Some(format!("E{}-{}", &caps[1], caps[2].to_uppercase()));
            info.generation = caps.get(3).map(|m| format!("v{}", m.as_str()));
        }
        return info;
    }
    for family in ["Celeron", "Pentium", "Atom"] {
        if cleaned.contains(&family.to_lowercase()) {
            let mut info = FamilyInfo::named(family);
            info.model_number =
                INTEL_SMALL_MODEL_RE.captures(cleaned).map(|caps| caps[1].to_uppercase());
            return info;
        }
    }
    FamilyInfo::named("Other Intel")
}

// ---------------------------------------------------------------------------
// AMD grammar
// ---------------------------------------------------------------------------

static RYZEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bryzen\s*([3579])\b(\s*pro\b)?[\s-]*(\d{3,5}[a-z]{0,2})?")
        .expect("ryzen regex")
});

static AMD_MODEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{3,4}[a-z]{0,2})\b").expect("amd model regex"));

static A_SERIES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\ba(4|6|8|10|12)[- ]?(\d{3,4}[a-z]{0,2})?\b").expect("a-series regex")
});

static FX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bfx[- ]?(\d{4})\b").expect("fx regex"));

static EPYC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bepyc[\s-]*(\d{4}[a-z]{0,2})?\b").expect("epyc regex"));

/// FX core count by the leading model digit: FX-4xxx has 4 cores, FX-6xxx
/// has 6, FX-8xxx and FX-9xxx have 8.
fn fx_core_count(model_number: &str) -> Option<u32> {
    match model_number.chars().next()? {
        '4' => Some(4),
        '6' => Some(6),
        '8' | '9' => Some(8),
        _ => None,
    }
}

fn detect_amd_family(cleaned: &str) -> FamilyInfo {
    if cleaned.contains("threadripper") {
        let mut info = FamilyInfo::named("Ryzen Threadripper");
        info.model_number = AMD_MODEL_RE.captures(cleaned).map(|caps| caps[1].to_uppercase());
        return info;
    }
    if let Some(caps) = RYZEN_RE.captures(cleaned) {
        let mut info = FamilyInfo::named(format!("Ryzen {}", &caps[1]));
        if caps.get(2).is_some() {
            info.extra_info = Some("PRO".to_string());
        }
        info.model_number = caps.get(3).map(|m| m.as_str().to_uppercase());
        return info;
    }
    if let Some(caps) = EPYC_RE.captures(cleaned) {
        let mut info = FamilyInfo::named("EPYC");
        info.model_number = caps.get(1).map(|m| m.as_str().to_uppercase());
        return info;
    }
    if cleaned.contains("phenom") {
        let family = if cleaned.contains("phenom ii") { "Phenom II" } else { "Phenom" };
        let mut info = FamilyInfo::named(family);
        info.model_number = AMD_MODEL_RE.captures(cleaned).map(|caps| caps[1].to_uppercase());
        return info;
    }
    if cleaned.contains("athlon") {
        let mut info = FamilyInfo::named("Athlon");
        for variant in ["ii", "64", "x2", "x4"] {
            if cleaned.contains(&format!("athlon {}", variant)) {
                info.extra_info = Some(variant.to_uppercase());
                break;
            }
        }
        info.model_number = AMD_MODEL_RE.captures(cleaned).map(|caps| caps[1].to_uppercase());
        return info;
    }
    if let Some(caps) = FX_RE.captures(cleaned) {
        let model = caps[1].to_string();
        let mut info = FamilyInfo::named("FX");
        info.extra_info = fx_core_count(&model).map(|n| format!("{}-core", n));
        info.model_number = Some(model);
        return info;
    }
    if let Some(caps) = A_SERIES_RE.captures(cleaned) {
        let mut info = FamilyInfo::named(format!("A{}", &caps[1]));
        info.model_number = caps.get(2).map(|m| m.as_str().to_uppercase());
        return info;
    }
    FamilyInfo::named("Other AMD")
}

// ---------------------------------------------------------------------------
// Qualcomm / Apple / ARM / Samsung grammars
// ---------------------------------------------------------------------------

static SNAPDRAGON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bsnapdragon[\s-]*(\d+\+?[a-z]*)?").expect("snapdragon regex")
});

static GEN_N_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bgen\s*(\d{1,2})\b").expect("gen n regex"));

static SNAPDRAGON_VARIANT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(plus|ultra|pro|lite)\b").expect("snapdragon variant regex"));

fn detect_qualcomm_family(cleaned: &str) -> FamilyInfo {
    if let Some(caps) = SNAPDRAGON_RE.captures(cleaned) {
        let mut info = FamilyInfo::named("Snapdragon");
        info.model_number = caps.get(1).map(|m| m.as_str().to_uppercase());
        info.generation = GEN_N_RE.captures(cleaned).map(|g| format!("Gen {}", &g[1]));
        info.extra_info = SNAPDRAGON_VARIANT_RE.captures(cleaned).map(|v| {
            let variant = &v[1];
            format!("{}{}", variant[..1].to_uppercase(), variant[1..].to_lowercase())
        });
        return info;
    }
    FamilyInfo::named("Other Qualcomm")
}

static APPLE_M_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bm([123])\b(?:\s*(pro|max|ultra)\b)?").expect("apple m regex"));

static APPLE_A_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\ba(\d{1,2})\b(\s*bionic\b)?").expect("apple a regex"));

fn detect_apple_family(cleaned: &str) -> FamilyInfo {
    if let Some(caps) = APPLE_M_RE.captures(cleaned) {
        let mut info = FamilyInfo::named(format!("M{}", &caps[1]));
        info.extra_info = caps.get(2).map(|m| {
            let v = m.as_str();
            format!("{}{}", v[..1].to_uppercase(), v[1..].to_lowercase())
        });
        return info;
    }
    if let Some(caps) = APPLE_A_RE.captures(cleaned) {
        let mut info = FamilyInfo::named(format!("A{}", &caps[1]));
        if caps.get(2).is_some() {
            info.extra_info = Some("Bionic".to_string());
        }
        return info;
    }
    FamilyInfo::named("Other Apple")
}

static CORTEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bcortex[\s-]*a(\d+)\b").expect("cortex regex"));

static MEDIATEK_MODEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b((?:mt)?\d{3,4}[a-z]?)\b").expect("mediatek model regex"));

fn detect_arm_family(cleaned: &str) -> FamilyInfo {
    if let Some(caps) = CORTEX_RE.captures(cleaned) {
        return FamilyInfo::named(format!("Cortex-A{}", &caps[1]));
    }
    if cleaned.contains("mediatek") {
        let mut info = FamilyInfo::named("MediaTek");
        info.model_number = MEDIATEK_MODEL_RE.captures(cleaned).map(|caps| caps[1].to_uppercase());
        return info;
    }
    FamilyInfo::named("Other ARM")
}

static EXYNOS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bexynos[\s-]*(\d{3,4})?\b").expect("exynos regex"));

fn detect_samsung_family(cleaned: &str) -> FamilyInfo {
    if let Some(caps) = EXYNOS_RE.captures(cleaned) {
        let mut info = FamilyInfo::named("Exynos");
        info.model_number = caps.get(1).map(|m| m.as_str().to_string());
        return info;
    }
    FamilyInfo::named("Other Samsung")
}

fn detect_family(cleaned: &str, brand: Brand) -> FamilyInfo {
    match brand {
        Brand::Intel => detect_intel_family(cleaned),
        Brand::Amd => detect_amd_family(cleaned),
        Brand::Qualcomm => detect_qualcomm_family(cleaned),
        Brand::Apple => detect_apple_family(cleaned),
        Brand::Arm => detect_arm_family(cleaned),
        Brand::Samsung => detect_samsung_family(cleaned),
        Brand::Other => FamilyInfo::unknown(),
    }
}

// ---------------------------------------------------------------------------
// Generation inference
// ---------------------------------------------------------------------------

static EXPLICIT_GEN_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(\d{1,2})\s*(?:st|nd|rd|th)\s*gen(?:eration)?\b",
        r"(?i)\bgen\s*(\d{1,2})\b",
        r"(?i)\b(\d{1,2})\s*ª?\s*generaci[oó]n\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("generation regex"))
    .collect()
});

pub(crate) fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Leading digit(s) of a 3-5 digit model number encode the generation by
/// Intel/AMD convention: 3-digit models are 1st Gen, 4-digit models take the
/// first digit, 5-digit models the first two.
fn generation_from_model(model_number: &str) -> Option<String> {
    let digits: String = model_number.chars().take_while(|c| c.is_ascii_digit()).collect();
    let n = match digits.len() {
        3 => 1,
        4 => digits[..1].parse::<u32>().ok()?,
        5 => digits[..2].parse::<u32>().ok()?,
        _ => return None,
    };
    if n == 0 {
        return None;
    }
    Some(format!("{} Gen", ordinal(n)))
}

fn detect_generation(cleaned: &str, info: &FamilyInfo, brand: Brand) -> Option<String> {
    // Structural markers found by the family grammar (Xeon "v3", Snapdragon
    // "Gen 2") are already explicit text; keep their vendor spelling.
    if let Some(structural) = &info.generation {
        return Some(structural.clone());
    }
    for re in EXPLICIT_GEN_RES.iter() {
        if let Some(caps) = re.captures(cleaned) {
            if let Ok(n) = caps[1].parse::<u32>() {
                if n >= 1 {
                    return Some(format!("{} Gen", ordinal(n)));
                }
            }
        }
    }
    match brand {
        Brand::Intel if info.family.starts_with("Core i") => {
            info.model_number.as_deref().and_then(generation_from_model)
        }
        Brand::Amd if info.family.starts_with("Ryzen") => {
            info.model_number.as_deref().and_then(generation_from_model)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Clock speed
// ---------------------------------------------------------------------------

static SPEED_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(\d+(?:[.,]\d+)?)\s*ghz\b",
        r"@\s*(\d+(?:[.,]\d+)?)",
        r"(?i)(\d+(?:[.,]\d+)?)\s*hz\b",
        r"(?i)(\d+(?:[.,]\d+)?)\s*gh\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("speed regex"))
    .collect()
});

static DECIMAL_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+[.,]\d+").expect("decimal token regex"));

/// Plausible clock-speed window for the bare-decimal fallback.
const SPEED_FALLBACK_MIN_GHZ: f64 = 1.0;
const SPEED_FALLBACK_MAX_GHZ: f64 = 5.5;

fn detect_clock_speed(cleaned: &str) -> Option<f64> {
    for re in SPEED_RES.iter() {
        if let Some(caps) = re.captures(cleaned) {
            if let Some(value) = parse_number(&caps[1]) {
                if value > 0.0 {
                    return Some(value);
                }
            }
        }
    }
    // Spreadsheet text often places the speed as a bare trailing decimal;
    // take the largest plausible one.
    DECIMAL_TOKEN_RE
        .find_iter(cleaned)
        .filter_map(|m| parse_number(m.as_str()))
        .filter(|v| (SPEED_FALLBACK_MIN_GHZ..=SPEED_FALLBACK_MAX_GHZ).contains(v))
        .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
}

fn format_speed(ghz: f64) -> String {
    if (ghz * 10.0 - (ghz * 10.0).round()).abs() < 1e-9 {
        format!("{:.1} GHz", ghz)
    } else {
        format!("{:.2} GHz", ghz)
    }
}

// ---------------------------------------------------------------------------
// Architecture suffix
// ---------------------------------------------------------------------------

const INTEL_SUFFIXES: [(&str, &str); 8] = [
    ("K", "Unlocked multiplier"),
    ("F", "Requires discrete graphics"),
    ("T", "Power-optimized"),
    ("U", "Ultra-low power (mobile)"),
    ("H", "High-performance (mobile)"),
    ("S", "Special edition"),
    ("X", "Extreme (HEDT)"),
    ("G", "Includes discrete-class graphics"),
];

const AMD_SUFFIXES: [(&str, &str); 6] = [
    ("XT", "Enhanced boost clocks"),
    ("X", "Extended frequency range (XFR)"),
    ("G", "Integrated Radeon graphics"),
    ("U", "Low-power (mobile)"),
    ("H", "High-performance (mobile)"),
    ("S", "Slim (OEM)"),
];

/// Decode the trailing letter(s) of a model number into the vendor's meaning.
/// Unknown suffixes pass through labeled "Suffix <X>".
fn decode_suffix(model_number: &str, brand: Brand) -> Option<String> {
    let suffix: String =
        model_number.chars().rev().take_while(|c| c.is_ascii_alphabetic()).collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
    if suffix.is_empty() || suffix.len() == model_number.len() {
        return None;
    }
    let table: &[(&str, &str)] = match brand {
        Brand::Intel => &INTEL_SUFFIXES,
        Brand::Amd => &AMD_SUFFIXES,
        _ => return None,
    };
    for (letters, meaning) in table {
        if suffix.eq_ignore_ascii_case(letters) {
            return Some((*meaning).to_string());
        }
    }
    Some(format!("Suffix {}", suffix))
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn unknown_processor(original: &str, reason: &str) -> Classification<ClassifiedProcessor> {
    Classification::Degraded {
        value: ClassifiedProcessor {
            original_text: original.to_string(),
            brand: Brand::Other,
            family: "Unknown".to_string(),
            model_number: None,
            generation: None,
            architecture_suffix: None,
            clock_speed_ghz: None,
            extra_info: None,
            normalized_label: "Unknown".to_string(),
        },
        reason: reason.to_string(),
    }
}

/// Classify one raw processor cell. Total: never panics, degrades to
/// "Unknown" when neither a brand nor a family-distinctive token matches.
pub fn classify_processor(text: &str) -> Classification<ClassifiedProcessor> {
    if text.trim().is_empty() {
        return unknown_processor(text, "empty processor field");
    }

    let cleaned = clean_processor_text(text);
    let brand = detect_brand(&cleaned);
    let info = detect_family(&cleaned, brand);

    if brand == Brand::Other && info.family == "Unknown" {
        return unknown_processor(text, "unrecognized processor description");
    }

    let generation = detect_generation(&cleaned, &info, brand);
    let clock_speed_ghz = detect_clock_speed(&cleaned);
    let architecture_suffix =
        info.model_number.as_deref().and_then(|m| decode_suffix(m, brand));

    // Fixed assembly order: brand, family, model, extra info, generation,
    // speed, suffix meaning. Absent parts are omitted.
    let mut parts: Vec<String> = Vec::new();
    parts.push(brand.as_str().to_string());
    if info.family != "Unknown" {
        parts.push(info.family.clone());
    }
    if let Some(model) = &info.model_number {
        parts.push(model.clone());
    }
    if let Some(extra) = &info.extra_info {
        parts.push(extra.clone());
    }
    if let Some(generation) = &generation {
        parts.push(generation.clone());
    }
    if let Some(ghz) = clock_speed_ghz {
        parts.push(format_speed(ghz));
    }
    if let Some(suffix) = &architecture_suffix {
        parts.push(format!("({})", suffix));
    }
    let normalized_label = parts.join(" ");
    log::debug!("processor {:?} -> {:?}", text, normalized_label);

    Classification::Classified(ClassifiedProcessor {
        original_text: text.to_string(),
        brand,
        family: info.family,
        model_number: info.model_number,
        generation,
        architecture_suffix,
        clock_speed_ghz,
        extra_info: info.extra_info,
        normalized_label,
    })
}
