//! Vaults a test card and charges it against the sandbox.
//!
//! Reads credentials from `NETBANX_ACCOUNT_NUMBER`, `NETBANX_API_KEY` and
//! `NETBANX_API_SECRET`.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example vault_purchase
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use netbanx_rest::{
    AddressOptions, CardOptions, PaymentClient, ProfileOptions, models::Authorization,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let client = PaymentClient::from_env()?;
    if !client.has_credentials() {
        return Err("set NETBANX_ACCOUNT_NUMBER, NETBANX_API_KEY and NETBANX_API_SECRET".into());
    }

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs().to_string();

    let profile = client.create_profile(
        now.as_str(),
        "en_US",
        ProfileOptions::builder()
            .first_name("test")
            .last_name("test")
            .email("test@test.com")
            .build(),
    )?;
    let profile_id = profile["id"].as_str().unwrap_or_default().to_string();

    let address = client.create_address(&profile_id, "US", "10014", AddressOptions::default())?;
    let card = client.create_card(
        &profile_id,
        "4111111111111111",
        12,
        2030,
        CardOptions::builder()
            .maybe_billing_address_id(address["id"].as_str())
            .build(),
    )?;

    let token = card["paymentToken"].as_str().unwrap_or_default();
    let auth = Authorization::try_from(client.purchase(400, token, now.as_str())?)?;
    println!(
        "purchase {}: {} {}",
        auth.id.unwrap_or_default(),
        auth.status.unwrap_or_default(),
        auth.auth_code.unwrap_or_default()
    );

    client.delete_profile(&profile_id)?;
    Ok(())
}
