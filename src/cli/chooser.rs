//! Interactive VCP chooser.

use anyhow::Result;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Select};

use crate::domain::{ResolvedOptions, BUILTIN_VCPS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChooserOutcome {
    Selected(String),
    /// The user backed out; the launcher exits without starting anything.
    Rejected,
}

pub trait Chooser {
    fn choose(&self, opts: &ResolvedOptions) -> Result<ChooserOutcome>;
}

/// Run `chooser` if `opts` asks for it and record the selection.
///
/// Returns `false` when the user rejected the chooser.
pub fn apply_chooser(chooser: &dyn Chooser, opts: &mut ResolvedOptions) -> Result<bool> {
    if !opts.wants_chooser() {
        return Ok(true);
    }
    match chooser.choose(opts)? {
        ChooserOutcome::Selected(vcp) => {
            opts.vcp = Some(vcp);
            Ok(true)
        }
        ChooserOutcome::Rejected => Ok(false),
    }
}

/// Arrow-key menu on stderr listing the known VCPs.
#[derive(Debug, Clone)]
pub struct TerminalChooser {
    candidates: Vec<String>,
}

impl Default for TerminalChooser {
    fn default() -> Self {
        TerminalChooser::new(BUILTIN_VCPS.iter().map(|name| name.to_string()).collect())
    }
}

impl TerminalChooser {
    pub fn new(candidates: Vec<String>) -> Self {
        TerminalChooser { candidates }
    }

    fn default_index(&self, opts: &ResolvedOptions) -> usize {
        opts.vcp
            .as_deref()
            .and_then(|current| self.candidates.iter().position(|c| c == current))
            .unwrap_or(0)
    }
}

impl Chooser for TerminalChooser {
    fn choose(&self, opts: &ResolvedOptions) -> Result<ChooserOutcome> {
        if self.candidates.is_empty() {
            anyhow::bail!("No VCPs are available to choose from");
        }

        let term = Term::stderr();
        if !term.is_term() {
            eprintln!("info: the VCP chooser needs an interactive terminal; name a VCP to launch");
            return Ok(ChooserOutcome::Rejected);
        }

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Choose a VCP to launch")
            .default(self.default_index(opts))
            .items(&self.candidates)
            .interact_on_opt(&term)?;

        Ok(match selection {
            Some(idx) => ChooserOutcome::Selected(self.candidates[idx].clone()),
            None => ChooserOutcome::Rejected,
        })
    }
}
