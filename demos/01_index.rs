//! Prints every group of the ISS index as a text table.
//!
//! Run with: cargo run --example 01_index
//! Set `MOEX_USER` / `MOEX_PASSWORD` to log in to MOEX Passport first.

use moex_iss::IssClient;
use moex_iss::securities::DEFAULT_SECURITY;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = IssClient::builder();
    if let (Ok(user), Ok(password)) = (std::env::var("MOEX_USER"), std::env::var("MOEX_PASSWORD")) {
        builder = builder.credentials(user, password);
    }
    if let Ok(proxy) = std::env::var("MOEX_PROXY") {
        builder = builder.proxy(proxy);
    }
    let client = builder.connect().await?;
    println!("real-time access: {}\n", client.is_real_time().await);

    let index = client.index().await?;
    for (group, table) in &index {
        println!("===============\n {}\n", group.to_uppercase());
        println!("{:?}", table.columns);
        println!("{table}");
    }

    let description = client.security_description(DEFAULT_SECURITY).await?;
    println!("===============\n {DEFAULT_SECURITY}\n\n{description}");
    Ok(())
}
