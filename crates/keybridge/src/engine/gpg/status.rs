//! Parser for machine-readable status lines written on the status fd.

use crate::engine::SignatureInfo;

const STATUS_PREFIX: &str = "[GNUPG:] ";

/// Facts gathered from one engine run's status lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct StatusReport {
    pub(super) valid: bool,
    pub(super) signature_created: bool,
    pub(super) decryption_okay: bool,
    pub(super) decryption_failed: bool,
    pub(super) encryption_ended: bool,
    pub(super) status: Option<String>,
    pub(super) signature: SignatureInfo,
    pub(super) diagnostics: Vec<String>,
}

impl StatusReport {
    /// Parses status output. Lines without the status prefix are kept as
    /// diagnostics for error reporting.
    pub(super) fn parse(stderr: &str) -> Self {
        let mut report = Self::default();
        for line in stderr.lines() {
            match line.strip_prefix(STATUS_PREFIX) {
                Some(status) => report.apply(status),
                None if !line.trim().is_empty() => report.diagnostics.push(line.to_owned()),
                None => {}
            }
        }
        report
    }

    pub(super) fn diagnostic_text(&self) -> String {
        self.diagnostics.join("\n")
    }

    fn apply(&mut self, line: &str) {
        let (keyword, rest) = line.split_once(' ').unwrap_or((line, ""));
        let mut fields = rest.split(' ');
        match keyword {
            "NEWSIG" => self.signature = SignatureInfo::default(),
            "GOODSIG" => {
                self.record_signer(rest);
                self.status = Some("signature good".to_owned());
            }
            "EXPSIG" => {
                self.record_signer(rest);
                self.status = Some("signature expired".to_owned());
            }
            "EXPKEYSIG" => {
                self.record_signer(rest);
                self.signature.key_status = Some("signing key has expired".to_owned());
                self.status = Some("signing key has expired".to_owned());
            }
            "REVKEYSIG" => {
                self.record_signer(rest);
                self.signature.key_status = Some("signing key was revoked".to_owned());
                self.status = Some("signing key was revoked".to_owned());
            }
            "BADSIG" => {
                self.record_signer(rest);
                self.valid = false;
                self.status = Some("signature bad".to_owned());
            }
            "ERRSIG" => {
                self.valid = false;
                self.signature.keyid = fields.next().map(str::to_owned);
                self.signature.timestamp = fields.nth(3).map(str::to_owned);
                self.status = Some("signature error".to_owned());
            }
            "NO_PUBKEY" => {
                self.valid = false;
                self.status = Some("no public key".to_owned());
            }
            "VALIDSIG" => {
                self.valid = true;
                self.signature.fingerprint = fields.next().map(str::to_owned);
                self.signature.timestamp = fields.nth(1).map(str::to_owned);
                self.status.get_or_insert_with(|| "signature valid".to_owned());
            }
            "SIG_CREATED" => {
                self.signature_created = true;
                self.status = Some("signature created".to_owned());
            }
            "DECRYPTION_OKAY" => {
                self.decryption_okay = true;
                self.status = Some("decryption ok".to_owned());
            }
            "DECRYPTION_FAILED" => {
                self.decryption_failed = true;
                self.status = Some("decryption failed".to_owned());
            }
            "NO_SECKEY" => self.status = Some("no secret key".to_owned()),
            "END_ENCRYPTION" => {
                self.encryption_ended = true;
                self.status = Some("encryption ok".to_owned());
            }
            "INV_RECP" | "INV_SGNR" => self.status = Some("invalid recipient".to_owned()),
            "NO_RECP" => self.status = Some("no recipients".to_owned()),
            "NODATA" => self.status = Some("no data was provided".to_owned()),
            "FAILURE" => self.status = Some(format!("failure: {rest}")),
            _ => {}
        }
    }

    fn record_signer(&mut self, rest: &str) {
        let (keyid, username) = rest
            .split_once(' ')
            .map_or((rest, None), |(id, name)| (id, Some(name)));
        self.signature.keyid = Some(keyid.to_owned()).filter(|id| !id.is_empty());
        self.signature.username = username.map(str::to_owned);
    }
}
