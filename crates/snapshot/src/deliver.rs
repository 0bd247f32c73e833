//! Delivery-channel resolution.
//!
//! Precedence: explicit channel argument, then the configured default,
//! then the channel the invocation occurred in. The first candidate
//! that passes validation wins and no further fallback is attempted.
//! An explicit candidate that fails validation is terminal — falling
//! back silently would deliver to a channel the operator did not ask
//! for.

use tracing::debug;

use rollcall_common::{DeliveryTarget, ResolutionSource, UserError};

use crate::platform::ChannelGate;

/// Candidate channels for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryCandidates {
    pub explicit: Option<u64>,
    pub configured_default: Option<u64>,
    pub invocation_channel: u64,
}

/// Pick and validate the delivery target.
pub async fn resolve_target(
    candidates: DeliveryCandidates,
    gate: &dyn ChannelGate,
) -> Result<DeliveryTarget, UserError> {
    if let Some(channel) = candidates.explicit {
        return match gate.validate(channel).await {
            Ok(()) => Ok(DeliveryTarget {
                channel,
                source: ResolutionSource::Explicit,
            }),
            Err(rejection) => {
                debug!(channel, rejection = rejection.as_str(), "explicit target rejected");
                Err(UserError::ChannelForbidden(channel))
            },
        };
    }

    if let Some(channel) = candidates.configured_default {
        match gate.validate(channel).await {
            Ok(()) => {
                return Ok(DeliveryTarget {
                    channel,
                    source: ResolutionSource::ConfiguredDefault,
                });
            },
            Err(rejection) => {
                debug!(
                    channel,
                    rejection = rejection.as_str(),
                    "configured default rejected, trying invocation channel"
                );
            },
        }
    }

    let channel = candidates.invocation_channel;
    match gate.validate(channel).await {
        Ok(()) => Ok(DeliveryTarget {
            channel,
            source: ResolutionSource::InvocationChannel,
        }),
        Err(rejection) => {
            debug!(channel, rejection = rejection.as_str(), "invocation channel rejected");
            Err(UserError::NoTargetChannel)
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;

    use crate::platform::GateRejection;

    use super::*;

    struct FakeGate {
        postable: HashSet<u64>,
    }

    impl FakeGate {
        fn allowing(channels: &[u64]) -> Self {
            Self {
                postable: channels.iter().copied().collect(),
            }
        }
    }

    #[async_trait]
    impl ChannelGate for FakeGate {
        async fn validate(&self, channel: u64) -> Result<(), GateRejection> {
            if self.postable.contains(&channel) {
                Ok(())
            } else {
                Err(GateRejection::MissingPermissions)
            }
        }
    }

    fn candidates(explicit: Option<u64>, default: Option<u64>) -> DeliveryCandidates {
        DeliveryCandidates {
            explicit,
            configured_default: default,
            invocation_channel: 30,
        }
    }

    #[tokio::test]
    async fn test_explicit_valid_wins() {
        let gate = FakeGate::allowing(&[10, 20, 30]);
        let target = resolve_target(candidates(Some(10), Some(20)), &gate)
            .await
            .unwrap();
        assert_eq!(target.channel, 10);
        assert_eq!(target.source, ResolutionSource::Explicit);
    }

    #[tokio::test]
    async fn test_explicit_invalid_is_terminal() {
        // 20 and 30 would both validate, but an explicit failure must
        // not fall back to them.
        let gate = FakeGate::allowing(&[20, 30]);
        let err = resolve_target(candidates(Some(10), Some(20)), &gate)
            .await
            .unwrap_err();
        assert_eq!(err, UserError::ChannelForbidden(10));
    }

    #[tokio::test]
    async fn test_default_used_without_explicit() {
        let gate = FakeGate::allowing(&[20, 30]);
        let target = resolve_target(candidates(None, Some(20)), &gate)
            .await
            .unwrap();
        assert_eq!(target.channel, 20);
        assert_eq!(target.source, ResolutionSource::ConfiguredDefault);
    }

    #[tokio::test]
    async fn test_invalid_default_falls_back_to_invocation_channel() {
        let gate = FakeGate::allowing(&[30]);
        let target = resolve_target(candidates(None, Some(20)), &gate)
            .await
            .unwrap();
        assert_eq!(target.channel, 30);
        assert_eq!(target.source, ResolutionSource::InvocationChannel);
    }

    #[tokio::test]
    async fn test_invocation_channel_when_nothing_configured() {
        let gate = FakeGate::allowing(&[30]);
        let target = resolve_target(candidates(None, None), &gate).await.unwrap();
        assert_eq!(target.channel, 30);
        assert_eq!(target.source, ResolutionSource::InvocationChannel);
    }

    #[tokio::test]
    async fn test_no_candidate_validates() {
        let gate = FakeGate::allowing(&[]);
        let err = resolve_target(candidates(None, Some(20)), &gate)
            .await
            .unwrap_err();
        assert_eq!(err, UserError::NoTargetChannel);
    }
}
