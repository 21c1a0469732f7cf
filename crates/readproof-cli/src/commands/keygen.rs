//! Keygen command implementation.

use readproof_core::KeyCustodian;
use serde_json::json;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let custodian = KeyCustodian::generate();
    let secret = custodian.export_secret();

    if json {
        let out = json!({
            "signing_key": secret.as_str(),
            "public_key": custodian.public_key_b64(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("READPROOF_SIGNING_KEY={}", secret.as_str());
        println!("READPROOF_PUBLIC_KEY={}", custodian.public_key_b64());
    }
    Ok(())
}
