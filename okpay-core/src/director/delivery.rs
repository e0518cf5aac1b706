//! Delivery of a [`TransferDirective`] to a signing channel.
//!
//! With a signing extension present the directive goes to the extension and
//! nothing else. Otherwise the native deep link is opened and, if it is not
//! acknowledged within the fallback window (or is refused outright), the
//! hosted signer page is opened instead.

use super::TransferDirective;
use async_trait::async_trait;
use okpay_sdk::objects::{AccountName, Memo, SETTLEMENT_ASSET};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Whether a navigation target was taken by something able to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationSignal {
    Handled,
    Unhandled,
}

/// Opens URLs in whatever surface the process runs in.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Open `target`. Resolves once the surface acknowledged or refused it;
    /// may stay pending when the surface gives no answer.
    async fn open(&self, target: &str) -> NavigationSignal;
}

#[async_trait]
impl<T: Navigator + ?Sized> Navigator for Arc<T> {
    async fn open(&self, target: &str) -> NavigationSignal {
        (**self).open(target).await
    }
}

/// Transfer request handed to a signing extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionTransferRequest {
    /// Sending account, left for the extension's user to choose when `None`
    pub from: Option<AccountName>,
    pub to: AccountName,
    /// Three fractional digits, without the asset suffix
    pub amount: String,
    pub memo: Memo,
    pub asset: &'static str,
}

/// Answer of a signing extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionResponse {
    pub success: bool,
    pub message: String,
}

/// An in-process signing agent able to sign transfers directly.
#[async_trait]
pub trait SigningExtension: Send + Sync {
    async fn request_transfer(&self, request: ExtensionTransferRequest) -> ExtensionResponse;
}

/// Channel chosen by the navigation race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceTarget {
    PrimaryDeepLink,
    FallbackSigner,
}

/// Terminal state of one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The extension answered; no navigation happened
    ExtensionHandled { success: bool, message: String },
    /// No extension; `url` is the last target navigated to
    ChannelRaced { target: RaceTarget, url: String },
}

/// Addresses and timing of the URL-based channels.
#[derive(Debug, Clone)]
pub struct DeliveryChannels {
    pub deep_link_scheme: String,
    pub fallback_signer: Url,
    pub fallback_after: Duration,
}

/// Routes each directive to exactly one signing flow.
pub struct TransferDirector<N> {
    navigator: N,
    extension: Option<Arc<dyn SigningExtension>>,
    channels: DeliveryChannels,
}

impl<N: Navigator> TransferDirector<N> {
    pub fn new(navigator: N, channels: DeliveryChannels) -> Self {
        Self {
            navigator,
            extension: None,
            channels,
        }
    }

    /// Route every delivery through `extension` instead of navigating.
    pub fn with_extension(mut self, extension: Arc<dyn SigningExtension>) -> Self {
        self.extension = Some(extension);
        self
    }

    pub fn has_extension(&self) -> bool {
        self.extension.is_some()
    }

    pub fn channels(&self) -> &DeliveryChannels {
        &self.channels
    }

    /// Deliver `directive` and report where it ended up.
    #[tracing::instrument(skip_all, fields(to = %directive.to(), amount = %directive.amount()))]
    pub async fn deliver(&self, directive: &TransferDirective) -> DeliveryOutcome {
        match &self.extension {
            Some(extension) => self.deliver_to_extension(extension.as_ref(), directive).await,
            None => self.race_channels(directive).await,
        }
    }

    async fn deliver_to_extension(
        &self,
        extension: &dyn SigningExtension,
        directive: &TransferDirective,
    ) -> DeliveryOutcome {
        let request = ExtensionTransferRequest {
            from: None,
            to: directive.to().clone(),
            amount: directive.amount().number(),
            memo: directive.memo().clone(),
            asset: SETTLEMENT_ASSET,
        };
        let response = extension.request_transfer(request).await;
        if response.success {
            info!(message = %response.message, "Signing extension accepted transfer");
        } else {
            warn!(message = %response.message, "Signing extension rejected transfer");
        }
        DeliveryOutcome::ExtensionHandled {
            success: response.success,
            message: response.message,
        }
    }

    async fn race_channels(&self, directive: &TransferDirective) -> DeliveryOutcome {
        let fallback = directive.fallback_url(&self.channels.fallback_signer);
        let primary = match directive.deep_link(&self.channels.deep_link_scheme) {
            Ok(link) => link,
            Err(e) => {
                warn!(error = %e, "Failed to encode deep link");
                return self.open_fallback(fallback).await;
            }
        };

        let signal = tokio::select! {
            signal = self.navigator.open(&primary) => Some(signal),
            _ = tokio::time::sleep(self.channels.fallback_after) => None,
        };

        match signal {
            Some(NavigationSignal::Handled) => {
                info!("Deep link handled by native signer");
                DeliveryOutcome::ChannelRaced {
                    target: RaceTarget::PrimaryDeepLink,
                    url: primary,
                }
            }
            Some(NavigationSignal::Unhandled) => {
                info!("Deep link refused, opening hosted signer");
                self.open_fallback(fallback).await
            }
            None => {
                info!(
                    after_ms = self.channels.fallback_after.as_millis() as u64,
                    "Deep link not acknowledged, opening hosted signer"
                );
                self.open_fallback(fallback).await
            }
        }
    }

    async fn open_fallback(&self, fallback: Url) -> DeliveryOutcome {
        if self.navigator.open(fallback.as_str()).await == NavigationSignal::Unhandled {
            warn!(url = %fallback, "Hosted signer could not be opened");
        }
        DeliveryOutcome::ChannelRaced {
            target: RaceTarget::FallbackSigner,
            url: fallback.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::ValidationResult;
    use crate::account::mock::record;
    use std::sync::Mutex;
    use tokio::time::Instant;

    const FALLBACK_AFTER: Duration = Duration::from_millis(1200);

    /// How the mock surface reacts to the native deep link.
    #[derive(Clone, Copy)]
    enum DeepLinkBehavior {
        Handle(Duration),
        Refuse,
        Hang,
    }

    struct MockNavigator {
        deep_link: DeepLinkBehavior,
        opened: Mutex<Vec<String>>,
    }

    impl MockNavigator {
        fn new(deep_link: DeepLinkBehavior) -> Arc<Self> {
            Arc::new(Self {
                deep_link,
                opened: Mutex::new(Vec::new()),
            })
        }

        fn opened(&self) -> Vec<String> {
            self.opened.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Navigator for MockNavigator {
        async fn open(&self, target: &str) -> NavigationSignal {
            self.opened.lock().unwrap().push(target.to_owned());
            if !target.starts_with("keychain://") {
                return NavigationSignal::Handled;
            }
            match self.deep_link {
                DeepLinkBehavior::Handle(delay) => {
                    tokio::time::sleep(delay).await;
                    NavigationSignal::Handled
                }
                DeepLinkBehavior::Refuse => NavigationSignal::Unhandled,
                DeepLinkBehavior::Hang => std::future::pending().await,
            }
        }
    }

    struct MockExtension {
        response: ExtensionResponse,
        requests: Mutex<Vec<ExtensionTransferRequest>>,
    }

    #[async_trait]
    impl SigningExtension for MockExtension {
        async fn request_transfer(&self, request: ExtensionTransferRequest) -> ExtensionResponse {
            self.requests.lock().unwrap().push(request);
            self.response.clone()
        }
    }

    fn channels() -> DeliveryChannels {
        DeliveryChannels {
            deep_link_scheme: "keychain".to_owned(),
            fallback_signer: Url::parse("https://hivesigner.com/sign/transfer").unwrap(),
            fallback_after: FALLBACK_AFTER,
        }
    }

    fn directive() -> TransferDirective {
        TransferDirective::build(
            &ValidationResult::Valid(record("alice")),
            10.0,
            Memo::parse("kcs-hpos-1234-5678").unwrap(),
        )
        .unwrap()
    }

    const FALLBACK_URL: &str =
        "https://hivesigner.com/sign/transfer?to=alice&amount=10.000+HBD&memo=kcs-hpos-1234-5678";

    #[tokio::test(start_paused = true)]
    async fn test_extension_takes_precedence_over_navigation() {
        let navigator = MockNavigator::new(DeepLinkBehavior::Handle(Duration::ZERO));
        let extension = Arc::new(MockExtension {
            response: ExtensionResponse {
                success: true,
                message: "broadcast".to_owned(),
            },
            requests: Mutex::new(Vec::new()),
        });
        let director =
            TransferDirector::new(navigator.clone(), channels()).with_extension(extension.clone());

        let outcome = director.deliver(&directive()).await;

        assert_eq!(
            outcome,
            DeliveryOutcome::ExtensionHandled {
                success: true,
                message: "broadcast".to_owned()
            }
        );
        assert!(navigator.opened().is_empty());
        let requests = extension.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].to.as_str(), "alice");
        assert_eq!(requests[0].amount, "10.000");
        assert_eq!(requests[0].asset, "HBD");
        assert_eq!(requests[0].from, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extension_failure_is_reported_without_fallback() {
        let navigator = MockNavigator::new(DeepLinkBehavior::Hang);
        let extension = Arc::new(MockExtension {
            response: ExtensionResponse {
                success: false,
                message: "user cancelled".to_owned(),
            },
            requests: Mutex::new(Vec::new()),
        });
        let director = TransferDirector::new(navigator.clone(), channels()).with_extension(extension);

        let outcome = director.deliver(&directive()).await;

        assert_eq!(
            outcome,
            DeliveryOutcome::ExtensionHandled {
                success: false,
                message: "user cancelled".to_owned()
            }
        );
        assert!(navigator.opened().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_acknowledged_deep_link_wins_race() {
        let navigator = MockNavigator::new(DeepLinkBehavior::Handle(Duration::from_millis(200)));
        let director = TransferDirector::new(navigator.clone(), channels());

        let outcome = director.deliver(&directive()).await;

        let DeliveryOutcome::ChannelRaced { target, url } = outcome else {
            panic!("expected a raced delivery");
        };
        assert_eq!(target, RaceTarget::PrimaryDeepLink);
        assert!(url.starts_with("keychain://requestBroadcast?operations="));
        assert_eq!(navigator.opened(), vec![url]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_deep_link_falls_back_after_window() {
        let navigator = MockNavigator::new(DeepLinkBehavior::Hang);
        let director = TransferDirector::new(navigator.clone(), channels());

        let started = Instant::now();
        let outcome = director.deliver(&directive()).await;

        let elapsed = started.elapsed();
        assert!(elapsed >= FALLBACK_AFTER && elapsed < FALLBACK_AFTER + Duration::from_millis(10));
        assert_eq!(
            outcome,
            DeliveryOutcome::ChannelRaced {
                target: RaceTarget::FallbackSigner,
                url: FALLBACK_URL.to_owned()
            }
        );
        let opened = navigator.opened();
        assert_eq!(opened.len(), 2);
        assert!(opened[0].starts_with("keychain://"));
        assert_eq!(opened[1], FALLBACK_URL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_acknowledgement_still_falls_back() {
        let navigator = MockNavigator::new(DeepLinkBehavior::Handle(Duration::from_millis(1500)));
        let director = TransferDirector::new(navigator.clone(), channels());

        let outcome = director.deliver(&directive()).await;

        assert_eq!(
            outcome,
            DeliveryOutcome::ChannelRaced {
                target: RaceTarget::FallbackSigner,
                url: FALLBACK_URL.to_owned()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_refused_deep_link_falls_back_immediately() {
        let navigator = MockNavigator::new(DeepLinkBehavior::Refuse);
        let director = TransferDirector::new(navigator.clone(), channels());

        let started = Instant::now();
        let outcome = director.deliver(&directive()).await;

        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(
            outcome,
            DeliveryOutcome::ChannelRaced {
                target: RaceTarget::FallbackSigner,
                url: FALLBACK_URL.to_owned()
            }
        );
        assert_eq!(navigator.opened().len(), 2);
    }
}
