use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{
    get_config_path, AutoQaDefaults, CoefficientDefaults, Config, DefaultsConfig, InputDefaults,
};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Print text with a typewriter effect, one character at a time.
fn typewriter(text: &str) {
    use std::thread;
    use std::time::Duration;
    for c in text.chars() {
        print!("{}", c);
        std::io::stdout().flush().ok();
        thread::sleep(Duration::from_millis(18));
    }
    println!();
}

/// Prompt for a non-negative number until the user provides one.
fn prompt_non_negative(message: &str, default: &str) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, default)?;
        match input.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => return Ok(v),
            Ok(_) => println!("  Invalid: must be non-negative. Try again."),
            Err(_) => println!("  Invalid: must be a non-negative number. Try again."),
        }
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    typewriter("MD Estimator Configuration Wizard");
    println!("=================================");
    println!();
    typewriter("These values fill the form when the calculator starts. You can always change them live in the form itself.");

    // 1. Default inputs
    println!();
    typewriter("Raw effort inputs, in man-days (MD). One MD is one person working one day.");
    let dev = prompt_non_negative("Development (MD)", "20")?;
    let arch = prompt_non_negative("Architecture/Research (MD)", "4")?;
    let pm = prompt_non_negative("PM/BA/Management (MD)", "3")?;

    // 2. Auto-QA
    println!();
    typewriter("QA effort can be derived automatically as a percentage of development effort.");
    typewriter("With auto-QA on, the QA field follows round(dev * percentage / 100) and is not directly editable.");
    let auto_qa_enabled = prompt_yes_no("Derive QA automatically?", true)?;
    let (percentage, qa) = if auto_qa_enabled {
        let percentage = loop {
            let input = prompt_with_default("QA percentage of Dev (0-100)", "30")?;
            match input.parse::<f64>() {
                Ok(v) if (0.0..=100.0).contains(&v) => break v,
                Ok(_) => println!("  Invalid: must be between 0 and 100. Try again."),
                Err(_) => println!("  Invalid: must be a number between 0 and 100. Try again."),
            }
        };
        (percentage, None)
    } else {
        let qa = prompt_non_negative("QA (MD)", "6")?;
        (30.0, Some(qa))
    };

    // 3. Coefficients
    println!();
    typewriter("Coefficients adjust the raw inputs:");
    typewriter("  Focus factor         -- productivity loss from context switching; 1.0 means none, 1.2 adds 20%.");
    typewriter("  Risk factor          -- buffer for uncertainty, proportional to core effort (e.g., 0.25).");
    typewriter("  Communication buffer -- coordination overhead, proportional to base effort (e.g., 0.15).");
    let focus_factor = prompt_non_negative("Focus factor", "1.2")?;
    let risk_factor = prompt_non_negative("Risk factor", "0.25")?;
    let comm_buffer = prompt_non_negative("Communication buffer", "0.15")?;

    // 4. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    // Check if file already exists
    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        defaults: Some(DefaultsConfig {
            inputs: Some(InputDefaults {
                dev: Some(dev),
                qa,
                arch: Some(arch),
                pm: Some(pm),
            }),
            coefficients: Some(CoefficientDefaults {
                focus_factor: Some(focus_factor),
                risk_factor: Some(risk_factor),
                comm_buffer: Some(comm_buffer),
            }),
            auto_qa: Some(AutoQaDefaults {
                enabled: Some(auto_qa_enabled),
                percentage: Some(percentage),
            }),
        }),
        export: None,
        theme: None,
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `md-estimator` to get started.");

    Ok(())
}
