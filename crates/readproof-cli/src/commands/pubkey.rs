//! Pubkey command implementation.

use readproof_core::KeyCustodian;

pub fn run(signing_key: String) -> Result<(), Box<dyn std::error::Error>> {
    let custodian = KeyCustodian::from_secret(&signing_key)?;
    println!("{}", custodian.public_key_b64());
    Ok(())
}
