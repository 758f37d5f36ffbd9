//! Settings command implementation

use colored::Colorize;
use log::debug;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::CommandContext;
use crate::config::ScannerSettings;
use crate::error::Result;
use crate::models::SettingsDisplay;
use crate::output::Formattable;

/// Changes requested by `settings set`. `None` leaves a value untouched.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub concurrency: Option<u32>,
    pub rate_limit: Option<u32>,
    pub csp_enabled: Option<bool>,
    pub csp_policy: Option<String>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.concurrency.is_none()
            && self.rate_limit.is_none()
            && self.csp_enabled.is_none()
            && self.csp_policy.is_none()
    }

    fn apply(self, settings: &mut ScannerSettings) {
        if let Some(limit) = self.concurrency {
            settings.concurrency_limit = limit;
        }
        if let Some(limit) = self.rate_limit {
            settings.rate_limit = limit;
        }
        if let Some(enabled) = self.csp_enabled {
            settings.csp_enabled = enabled;
        }
        if let Some(policy) = self.csp_policy {
            settings.csp_policy = Some(policy).filter(|p| !p.trim().is_empty());
        }
    }
}

/// Show the saved scanner settings
pub fn show(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    SettingsDisplay::from(&ctx.config.settings).print(ctx.format)
}

/// Apply changes and persist them to the config file
pub fn set(opts: &GlobalOptions, update: SettingsUpdate) -> Result<()> {
    let mut ctx = CommandContext::new(opts)?;

    let human = ctx.format != OutputFormat::Json;

    if update.is_empty() {
        if human {
            println!("Nothing to change. Current settings:");
        }
    } else {
        update.apply(&mut ctx.config.settings);
        ctx.config.save_at(opts.config_ref())?;
        debug!("Saved settings {:?}", ctx.config.settings);

        if human {
            println!("{} Settings saved", "✓".green());
        }
    }

    SettingsDisplay::from(&ctx.config.settings).print(ctx.format)
}
