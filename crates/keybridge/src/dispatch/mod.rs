//! Routes validated requests to crypto engine operations.
//!
//! Each [`Action`] maps to one handler. The match is exhaustive, so adding an
//! action without a handler does not compile.

mod arguments;
mod error;

use std::path::Path;

use tracing::debug;

use self::arguments::Arguments;
pub use self::error::DispatchError;
use crate::engine::{
    CryptoEngine, EncryptOptions, EngineError, ExportOptions, ListKeysOptions, OperationResult,
    Payload, SignOptions, StreamVerify,
};
use crate::whitelist::{Action, ValidatedRequest};

const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Invokes engine operations for validated requests.
pub struct Dispatcher<'a, E: ?Sized> {
    engine: &'a E,
    temp_dir: Option<&'a Path>,
}

impl<'a, E: CryptoEngine + ?Sized> Dispatcher<'a, E> {
    /// Creates a dispatcher. `temp_dir` hosts temporary signature files and
    /// defaults to the system temporary directory.
    #[must_use]
    pub const fn new(engine: &'a E, temp_dir: Option<&'a Path>) -> Self {
        Self { engine, temp_dir }
    }

    /// Performs the single engine call for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when an argument cannot be decoded or the
    /// engine fails. Negative outcomes, such as a bad signature, are not
    /// errors.
    pub fn dispatch(&self, request: &ValidatedRequest) -> Result<OperationResult, DispatchError> {
        let action = request.action();
        let args = Arguments::new(request);
        debug!(
            target: DISPATCH_TARGET,
            action = action.as_str(),
            positional = request.args().len(),
            keywords = request.kwargs().len(),
            "dispatching request"
        );
        let handled = match action {
            Action::GetVersion => self.get_version(),
            Action::ListKeys => self.list_keys(&args),
            Action::Sign => self.sign(&args),
            Action::VerifySignatureAgainstData => self.verify(&args),
            Action::Encrypt => self.encrypt(&args),
            Action::Decrypt => self.decrypt(&args),
            Action::ExportKeys => self.export_keys(&args),
        };
        handled.map_err(|failure| match failure {
            Failure::Engine(source) => DispatchError::Engine { action, source },
            Failure::Dispatch(error) => error,
        })
    }

    fn get_version(&self) -> Result<OperationResult, Failure> {
        Ok(OperationResult::Version(self.engine.version()?))
    }

    fn list_keys(&self, args: &Arguments<'_>) -> Result<OperationResult, Failure> {
        let secret = args.boolean(0)?;
        let options = ListKeysOptions {
            sigs: args.keyword_bool("sigs", false)?,
            keys: args.keyword_strings("keys")?,
        };
        Ok(OperationResult::KeyListing(
            self.engine.list_keys(secret, &options)?,
        ))
    }

    fn sign(&self, args: &Arguments<'_>) -> Result<OperationResult, Failure> {
        let message = Payload::from(args.string(0)?).into_data_bytes();
        let defaults = SignOptions::default();
        let options = SignOptions {
            keyid: args.keyword_string("keyid")?,
            clearsign: args.keyword_bool("clearsign", defaults.clearsign)?,
            detach: args.keyword_bool("detach", defaults.detach)?,
            binary: args.keyword_bool("binary", defaults.binary)?,
        };
        Ok(OperationResult::Sign(
            self.engine.sign(&message, &options)?,
        ))
    }

    fn verify(&self, args: &Arguments<'_>) -> Result<OperationResult, Failure> {
        let signature = Payload::from(args.string(0)?);
        let data = Payload::from(args.string(1)?);
        Ok(OperationResult::Verify(self.engine.verify_streams(
            signature,
            data,
            self.temp_dir,
        )?))
    }

    fn encrypt(&self, args: &Arguments<'_>) -> Result<OperationResult, Failure> {
        let data = Payload::from(args.string(0)?).into_data_bytes();
        let recipients = vec![args.string(1)?.to_owned()];
        let options = EncryptOptions {
            armor: args.keyword_bool("armor", EncryptOptions::default().armor)?,
        };
        Ok(OperationResult::Crypt(self.engine.encrypt(
            &data,
            &recipients,
            &options,
        )?))
    }

    fn decrypt(&self, args: &Arguments<'_>) -> Result<OperationResult, Failure> {
        let message = args.string(0)?;
        Ok(OperationResult::Crypt(
            self.engine.decrypt(message.as_bytes())?,
        ))
    }

    fn export_keys(&self, args: &Arguments<'_>) -> Result<OperationResult, Failure> {
        let keyids = vec![args.string(0)?.to_owned()];
        let defaults = ExportOptions::default();
        let options = ExportOptions {
            minimal: args.keyword_bool("minimal", defaults.minimal)?,
            armor: args.keyword_bool("armor", defaults.armor)?,
        };
        Ok(OperationResult::PlainText(
            self.engine.export_keys(&keyids, &options)?,
        ))
    }
}

enum Failure {
    Dispatch(DispatchError),
    Engine(EngineError),
}

impl From<DispatchError> for Failure {
    fn from(error: DispatchError) -> Self {
        Self::Dispatch(error)
    }
}

impl From<EngineError> for Failure {
    fn from(error: EngineError) -> Self {
        Self::Engine(error)
    }
}

#[cfg(test)]
mod tests;
