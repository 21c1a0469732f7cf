//! Canonicalize command implementation.

use readproof_canonical::{encode, AttestationFact};
use std::io::{self, Read};

pub fn run(input: Option<String>, hash: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Read JSON from file or stdin
    let json_str = if let Some(path) = input {
        std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read file {}: {}", path, e))?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let fact: AttestationFact =
        serde_json::from_str(&json_str).map_err(|e| format!("Invalid attestation JSON: {}", e))?;

    let canonical = encode(&fact).map_err(|e| format!("Canonicalization failed: {}", e))?;

    if hash {
        println!("{}", canonical.payload_hash().b64);
    } else {
        println!("{}", String::from_utf8_lossy(&canonical.bytes));
    }
    Ok(())
}
