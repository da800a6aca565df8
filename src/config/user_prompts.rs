//! First-run prompt for the provider gateway address.

use crate::error::AppError;
use tokio::io::{self, AsyncBufReadExt};

/// Prompts the user for the API domain on stdin and returns the trimmed input.
///
/// # Example
/// ```no_run
/// use baseball_depot::config::user_prompts::prompt_for_api_domain;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let api_domain = prompt_for_api_domain().await?;
/// println!("Got API domain: {}", api_domain);
/// # Ok(())
/// # }
/// ```
pub async fn prompt_for_api_domain() -> Result<String, AppError> {
    println!("Please enter the statistics API domain: ");
    let mut input = String::new();
    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin);
    reader.read_line(&mut input).await?;
    Ok(input.trim().to_string())
}
