use anyhow::Result;

/// Source of answers for the configuration wizard.
pub trait PromptDriver {
    /// Picks one of `options`, returning its index.
    fn ask_select(&self, title: &str, help: Option<&str>, options: &[String]) -> Result<usize>;
    fn ask_bool(&self, title: &str, help: &str, default: bool) -> Result<bool>;
    fn ask_string(&self, title: &str, help: &str, default: &str) -> Result<String>;
    fn ask_u64(
        &self,
        title: &str,
        help: &str,
        default: u64,
        min: Option<u64>,
        max: Option<u64>,
    ) -> Result<u64>;
    fn ask_f64(
        &self,
        title: &str,
        help: &str,
        default: f64,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<f64>;
}

/// Accepts every default without asking. Used for non-interactive runs.
pub struct DefaultsDriver;

impl PromptDriver for DefaultsDriver {
    fn ask_select(&self, _title: &str, _help: Option<&str>, options: &[String]) -> Result<usize> {
        anyhow::ensure!(!options.is_empty(), "nothing to select");
        Ok(0)
    }

    fn ask_bool(&self, _title: &str, _help: &str, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn ask_string(&self, _title: &str, _help: &str, default: &str) -> Result<String> {
        Ok(default.to_string())
    }

    fn ask_u64(
        &self,
        _title: &str,
        _help: &str,
        default: u64,
        _min: Option<u64>,
        _max: Option<u64>,
    ) -> Result<u64> {
        Ok(default)
    }

    fn ask_f64(
        &self,
        _title: &str,
        _help: &str,
        default: f64,
        _min: Option<f64>,
        _max: Option<f64>,
    ) -> Result<f64> {
        Ok(default)
    }
}
