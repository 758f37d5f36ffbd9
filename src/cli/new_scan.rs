//! Interactive new-scan form

use colored::Colorize;
use dialoguer::{Input, Password, Select, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::cli::scan;
use crate::error::Result;
use crate::scanner::{AuthMethod, ScanMode, ScanRequest};

const MODES: [ScanMode; 3] = [ScanMode::Passive, ScanMode::Active, ScanMode::Authenticated];
const AUTH_METHODS: [AuthMethod; 3] = [AuthMethod::None, AuthMethod::Form, AuthMethod::Header];

/// Prompt for a scan, then submit it and follow it live
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let theme = ColorfulTheme::default();

    println!("{}", "New Scan".bold().green());
    println!("Configure and launch a new web application security scan.\n");

    let target_url: String = Input::with_theme(&theme)
        .with_prompt("Target URL")
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            ScanRequest::new(input.clone())
                .validate()
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;

    let mode = Select::with_theme(&theme)
        .with_prompt("Scan mode")
        .items(&MODES)
        .default(0)
        .interact()?;

    let mut request = ScanRequest {
        scan_mode: MODES[mode],
        ..ScanRequest::new(target_url)
    };

    if request.scan_mode == ScanMode::Authenticated {
        let method = Select::with_theme(&theme)
            .with_prompt("Authentication method")
            .items(&AUTH_METHODS)
            .default(0)
            .interact()?;
        request.auth_method = AUTH_METHODS[method];

        match request.auth_method {
            AuthMethod::Form => {
                let username: String = Input::with_theme(&theme)
                    .with_prompt("Username")
                    .interact_text()?;
                let password = Password::with_theme(&theme)
                    .with_prompt("Password")
                    .interact()?;
                request.username = Some(username);
                request.password = Some(password);
            }
            AuthMethod::Header => {
                let token = Password::with_theme(&theme)
                    .with_prompt("Authorization token")
                    .interact()?;
                request.token = Some(token);
            }
            AuthMethod::None => {}
        }
    }

    let details = request.validate()?;
    println!("\n{}", "Scan queued. Following progress...".cyan());

    scan::submit_and_follow(opts, vec![details], false, None).await
}
