use std::io::{self, Write};

/// Function to read a trimmed line from standard input
pub fn read_line() -> io::Result<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Function to prompt for a labeled value
pub fn prompt(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    read_line()
}

/// Function to prompt for a hidden value, e.g. passwords
pub fn prompt_secret(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let value = rpassword::read_password()?;
    Ok(value.trim().to_string())
}
