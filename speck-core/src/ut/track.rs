// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use colored::*;
use kdam::{Bar, tqdm};

/// A progress bar for tracking images as they are scanned
pub fn progress_bar(n: usize, desc: &str, verbose: bool) -> Bar {
    if !verbose {
        return tqdm!(disable = true);
    }

    tqdm!(
        total = n,
        force_refresh = false,
        desc = progress_timestamp(desc),
        bar_format =
            "{desc suffix=' '}[{percentage:.0}%] ({rate:.1}/s, eta: {remaining human=true})"
    )
}

/// Prefix a message with a standardized timestamp and tag
pub fn progress_timestamp(desc: &str) -> String {
    let time = chrono::Local::now().format("%Y-%m-%d | %H:%M:%S");

    format!(
        "{} {} {} {} {} {}",
        "[".bold(),
        time,
        "|".bold(),
        "speck".truecolor(214, 124, 58).bold(),
        "]".bold(),
        desc,
    )
}

/// Print timestamped statements to console
pub fn progress_log(desc: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("{}", progress_timestamp(desc));
}

/// Print a timestamped warning to stderr regardless of verbosity
pub fn warning_log(desc: &str) {
    let tag = "WARNING:".yellow().bold().to_string();
    eprintln!("{} {}", progress_timestamp(&tag), desc);
}

/// Format numbers with comma-separated thousands
pub fn thousands_format<T>(number: T) -> String
where
    T: std::fmt::Display,
{
    let number = number.to_string();

    if number.len() <= 4 {
        return number;
    }

    let digits: Vec<char> = number.chars().collect();
    let head = digits.len() % 3;

    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (i + 3 - head) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    formatted
}
