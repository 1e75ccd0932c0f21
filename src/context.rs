use crate::{
    config::Config,
    followup::{EditOriginal, FollowupNotifier},
    llm::{Complete, CompletionClient},
    verify::SignatureVerifier,
};
use anyhow::Result;
use std::sync::Arc;

/// Collection of data that is shared across interactions
///
/// Built once at startup.  Cloning is cheap, which lets detached follow-up tasks keep their own
/// handle after the request that spawned them has finished.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    cfg: Config,
    verifier: SignatureVerifier,
    completion: Arc<dyn Complete>,
    notifier: Arc<dyn EditOriginal>,
}

impl Context {
    pub fn new(cfg: Config) -> Result<Self> {
        let completion = Arc::new(CompletionClient::new(&cfg.llm));
        let notifier = Arc::new(FollowupNotifier::new(&cfg.discord));
        Self::with_clients(cfg, completion, notifier)
    }

    /// Like [`Context::new`] with the outbound clients supplied by the caller.
    pub fn with_clients(
        cfg: Config,
        completion: Arc<dyn Complete>,
        notifier: Arc<dyn EditOriginal>,
    ) -> Result<Self> {
        let verifier = SignatureVerifier::new(cfg.discord.public_key.as_deref())?;
        Ok(Self {
            inner: Arc::new(ContextInner {
                cfg,
                verifier,
                completion,
                notifier,
            }),
        })
    }

    pub fn cfg(&self) -> &Config {
        &self.inner.cfg
    }

    pub fn verifier(&self) -> &SignatureVerifier {
        &self.inner.verifier
    }

    pub fn completion(&self) -> &dyn Complete {
        self.inner.completion.as_ref()
    }

    pub fn notifier(&self) -> &dyn EditOriginal {
        self.inner.notifier.as_ref()
    }
}
