//! Execution environment detection
//!
//! Serverless platforms and WebAssembly hosts cannot run native OCR engines
//! reliably. The probe inspects well-known platform variables and the compile
//! target to decide whether OCR should be attempted at all.

/// Variables whose presence marks a serverless platform
pub const SERVERLESS_INDICATORS: &[&str] = &[
    "VERCEL",
    "AWS_LAMBDA_FUNCTION_NAME",
    "NETLIFY",
    "LAMBDA_TASK_ROOT",
];

/// Explicit OCR override (`1`/`true`/`on` or `0`/`false`/`off`)
pub const OCR_OVERRIDE_VAR: &str = "DOCTEXT_OCR";

/// Snapshot of the environment facts that affect extraction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvironmentProbe {
    indicator: Option<String>,
    ocr_override: Option<bool>,
    wasm: bool,
}

impl EnvironmentProbe {
    /// Probe the current process environment
    #[must_use]
    pub fn detect() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Probe using a custom variable lookup
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let indicator = SERVERLESS_INDICATORS
            .iter()
            .find(|key| lookup(key).is_some_and(|value| !value.trim().is_empty()))
            .map(|key| (*key).to_string());

        let ocr_override = lookup(OCR_OVERRIDE_VAR).and_then(|value| {
            let parsed = parse_switch(&value);
            if parsed.is_none() {
                log::warn!("Ignoring {OCR_OVERRIDE_VAR}={value:?}: expected on/off");
            }
            parsed
        });

        Self {
            indicator,
            ocr_override,
            wasm: cfg!(target_family = "wasm"),
        }
    }

    /// First serverless indicator found, if any
    #[must_use]
    pub fn indicator(&self) -> Option<&str> {
        self.indicator.as_deref()
    }

    /// Whether this looks like a constrained runtime
    #[must_use]
    pub const fn is_constrained(&self) -> bool {
        self.wasm || self.indicator.is_some()
    }

    /// Whether OCR should be attempted
    ///
    /// WebAssembly targets never run OCR. Elsewhere the override wins, then
    /// platform detection.
    #[must_use]
    pub const fn ocr_supported(&self) -> bool {
        if self.wasm {
            return false;
        }
        match self.ocr_override {
            Some(forced) => forced,
            None => self.indicator.is_none(),
        }
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn probe(vars: &[(&str, &str)]) -> EnvironmentProbe {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        EnvironmentProbe::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_plain_host_supports_ocr() {
        let env = probe(&[]);
        assert_eq!(env.indicator(), None);
        assert!(!env.is_constrained());
        assert!(env.ocr_supported());
    }

    #[test]
    fn test_each_indicator_disables_ocr() {
        for key in SERVERLESS_INDICATORS {
            let env = probe(&[(key, "1")]);
            assert_eq!(env.indicator(), Some(*key));
            assert!(!env.ocr_supported(), "{key} should disable OCR");
        }
    }

    #[test]
    fn test_empty_indicator_is_ignored() {
        let env = probe(&[("VERCEL", "")]);
        assert!(env.ocr_supported());
    }

    #[test]
    fn test_override_forces_on() {
        let env = probe(&[("AWS_LAMBDA_FUNCTION_NAME", "fn"), (OCR_OVERRIDE_VAR, "on")]);
        assert!(env.is_constrained());
        assert!(env.ocr_supported());
    }

    #[test]
    fn test_override_forces_off() {
        let env = probe(&[(OCR_OVERRIDE_VAR, "FALSE")]);
        assert!(!env.ocr_supported());
    }

    #[test]
    fn test_invalid_override_is_ignored() {
        let env = probe(&[("NETLIFY", "true"), (OCR_OVERRIDE_VAR, "maybe")]);
        assert!(!env.ocr_supported());
    }
}
