use crate::ui::cli::drivers::PromptDriver;
use anyhow::Result;
use inquire::{Confirm, CustomType, Select, Text, validator::Validation};
use std::fmt::Display;

/// Terminal prompts backed by `inquire`.
pub struct InquireDriver;

fn bound_message<T: Display>(min: Option<T>, max: Option<T>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("Must be between {lo} and {hi}"),
        (Some(lo), None) => format!("Must be ≥ {lo}"),
        (None, Some(hi)) => format!("Must be ≤ {hi}"),
        (None, None) => String::new(),
    }
}

fn bounded<'a, T>(q: CustomType<'a, T>, min: Option<T>, max: Option<T>) -> CustomType<'a, T>
where
    T: Copy + Clone + PartialOrd + Display + 'static,
{
    if min.is_none() && max.is_none() {
        return q;
    }
    q.with_validator(move |x: &T| {
        let below = min.is_some_and(|lo| *x < lo);
        let above = max.is_some_and(|hi| *x > hi);
        if below || above {
            Ok(Validation::Invalid(bound_message(min, max).into()))
        } else {
            Ok(Validation::Valid)
        }
    })
}

impl PromptDriver for InquireDriver {
    fn ask_select(&self, title: &str, help: Option<&str>, options: &[String]) -> Result<usize> {
        let mut select = Select::new(title, options.to_vec());
        if let Some(help) = help {
            select = select.with_help_message(help);
        }
        Ok(select.raw_prompt()?.index)
    }

    fn ask_bool(&self, title: &str, help: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new(title)
            .with_default(default)
            .with_help_message(help)
            .prompt()?)
    }

    fn ask_string(&self, title: &str, help: &str, default: &str) -> Result<String> {
        Ok(Text::new(title)
            .with_initial_value(default)
            .with_help_message(help)
            .prompt()?)
    }

    fn ask_u64(
        &self,
        title: &str,
        help: &str,
        default: u64,
        min: Option<u64>,
        max: Option<u64>,
    ) -> Result<u64> {
        let q = CustomType::<u64>::new(title)
            .with_default(default)
            .with_help_message(help);
        Ok(bounded(q, min, max).prompt()?)
    }

    fn ask_f64(
        &self,
        title: &str,
        help: &str,
        default: f64,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<f64> {
        let q = CustomType::<f64>::new(title)
            .with_default(default)
            .with_help_message(help);
        Ok(bounded(q, min, max).prompt()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_messages() {
        assert_eq!(bound_message(Some(1), Some(4)), "Must be between 1 and 4");
        assert_eq!(bound_message(Some(0.5), None), "Must be ≥ 0.5");
        assert_eq!(bound_message::<u64>(None, Some(9)), "Must be ≤ 9");
    }
}
