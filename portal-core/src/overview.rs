//! Landing page aggregation: four independent reads, then summary cards.

use crate::claims::{claims_for_customer, pending_count};
use crate::config::{Tab, Tone};
use crate::dto::{ChaosStatusDto, ClaimDto, PolicyDto, PortfolioDto};
use crate::format::{usd_whole, PLACEHOLDER};
use crate::gateway::{Gateway, StatusCheck};
use crate::policy::active_policy;
use crate::transport::Transport;
use serde::Serialize;

/// Whatever the overview reads managed to fetch. A `None` means that read
/// failed; the others are still used.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverviewSources {
    pub policies: Option<Vec<PolicyDto>>,
    pub portfolio: Option<PortfolioDto>,
    pub claims: Option<Vec<ClaimDto>>,
    pub chaos: Option<ChaosStatusDto>,
}

/// Issues the four reads concurrently and waits for all of them to settle.
pub async fn load_overview<T: Transport>(gateway: &Gateway<T>, customer: &str) -> OverviewSources {
    let (policies, portfolio, claims, chaos) = futures::join!(
        gateway.policies(customer, StatusCheck::Ignore),
        gateway.portfolio(customer, StatusCheck::Ignore),
        gateway.claims(StatusCheck::Ignore),
        gateway.chaos_status(StatusCheck::Ignore),
    );

    for (source, err) in [
        ("policy", policies.as_ref().err()),
        ("investments", portfolio.as_ref().err()),
        ("claims", claims.as_ref().err()),
        ("chaos", chaos.as_ref().err()),
    ] {
        if let Some(e) = err {
            tracing::warn!(%customer, source, error = %e, "overview source unavailable");
        }
    }

    OverviewSources {
        policies: policies.ok(),
        portfolio: portfolio.ok(),
        claims: claims.ok(),
        chaos: chaos.ok(),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryCard {
    #[serde(skip)]
    pub tab: Tab,
    pub icon: &'static str,
    pub title: &'static str,
    pub value: String,
    pub sub: String,
    pub tone: Tone,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverviewSummary {
    pub cards: Vec<SummaryCard>,
    pub active_policy: Option<PolicyDto>,
}

/// `fallback_services` is the service count shown when no snapshot arrived.
pub fn summarize(
    sources: &OverviewSources,
    customer: &str,
    fallback_services: usize,
) -> OverviewSummary {
    let active = sources
        .policies
        .as_deref()
        .and_then(active_policy)
        .cloned();

    let policy_card = SummaryCard {
        tab: Tab::Policy,
        icon: "📋",
        title: "Active Policy",
        value: active
            .as_ref()
            .map(|p| p.policy_number.clone())
            .unwrap_or_else(|| "None".into()),
        sub: active
            .as_ref()
            .map(|p| format!("{} · {}/mo", p.policy_type, p.premium_label()))
            .unwrap_or_else(|| "No active policy".into()),
        tone: Tone::Blue,
    };

    let portfolio_card = SummaryCard {
        tab: Tab::Investments,
        icon: "📈",
        title: "Portfolio Value",
        value: sources
            .portfolio
            .as_ref()
            .and_then(|p| p.total_value)
            .filter(|v| *v != 0.0)
            .map(usd_whole)
            .unwrap_or_else(|| PLACEHOLDER.into()),
        sub: sources
            .portfolio
            .as_ref()
            .map(|p| format!("{} holdings", p.holdings.len()))
            .unwrap_or_else(|| "No portfolio".into()),
        tone: Tone::Green,
    };

    let mine = sources
        .claims
        .as_deref()
        .map(|all| claims_for_customer(all, customer))
        .unwrap_or_default();
    let claims_card = SummaryCard {
        tab: Tab::Claims,
        icon: "📝",
        title: "Claims Filed",
        value: mine.len().to_string(),
        sub: if mine.is_empty() {
            "No claims on record".into()
        } else {
            format!("{} pending", pending_count(&mine))
        },
        tone: Tone::Amber,
    };

    let (healthy, total) = match &sources.chaos {
        Some(status) => (
            status
                .services
                .values()
                .filter(|s| s.healthy == Some(true))
                .count(),
            status.services.len(),
        ),
        None => (0, fallback_services),
    };
    let all_healthy = healthy == total;
    let health_card = SummaryCard {
        tab: Tab::Chaos,
        icon: "⚡",
        title: "System Health",
        value: format!("{healthy}/{total}"),
        sub: if all_healthy {
            "All services healthy".into()
        } else {
            format!("{} service(s) degraded", total - healthy)
        },
        tone: if all_healthy { Tone::Green } else { Tone::Red },
    };

    OverviewSummary {
        cards: vec![policy_card, portfolio_card, claims_card, health_card],
        active_policy: active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{investments_path, policy_path, CHAOS_STATUS_PATH, CLAIMS_PATH};
    use crate::testing::MockTransport;
    use crate::transport::ApiReply;
    use crate::error::GatewayError;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn one_failed_source_does_not_hide_the_others() {
        let mock = MockTransport::with_services(&["claims", "policy"]);
        mock.reply_to(
            &policy_path("CUST002"),
            200,
            r#"[{"id":"p1","policyNumber":"POL-9","policyType":"life","status":"active","premiumAmount":45}]"#,
        );
        mock.script(
            &investments_path("CUST002"),
            vec![Err(GatewayError::Transport("timeout".into()))],
        );
        mock.reply_to(
            CLAIMS_PATH,
            200,
            r#"[{"customerId":"CUST002","status":"pending"},{"customer_id":"CUST001"}]"#,
        );
        let gateway = Gateway::new(mock);

        let sources = load_overview(&gateway, "CUST002").await;

        assert!(sources.portfolio.is_none());
        assert_eq!(sources.policies.as_ref().map(Vec::len), Some(1));
        assert_eq!(sources.claims.as_ref().map(Vec::len), Some(2));
        assert_eq!(sources.chaos.as_ref().map(|c| c.services.len()), Some(2));
        assert_eq!(gateway.transport().count(CHAOS_STATUS_PATH), 1);

        let summary = summarize(&sources, "CUST002", 4);
        let values: Vec<&str> = summary.cards.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["POL-9", "—", "1", "2/2"]);
        assert_eq!(summary.cards[0].sub, "life · $45/mo");
        assert_eq!(summary.cards[1].sub, "No portfolio");
        assert_eq!(summary.cards[2].sub, "1 pending");
        assert_eq!(summary.cards[3].sub, "All services healthy");
    }

    #[tokio::test]
    async fn overview_reads_ignore_status_codes() {
        let mock = MockTransport::new();
        mock.script(
            CLAIMS_PATH,
            vec![Ok(ApiReply {
                status: 500,
                body: r#"{"error":"down"}"#.into(),
            })],
        );
        let gateway = Gateway::new(mock);

        let sources = load_overview(&gateway, "CUST001").await;

        assert_eq!(sources.claims, Some(Vec::new()));
    }

    #[test]
    fn health_falls_back_to_configured_count() {
        let summary = summarize(&OverviewSources::default(), "CUST001", 4);
        let health = &summary.cards[3];
        assert_eq!(health.value, "0/4");
        assert_eq!(health.sub, "4 service(s) degraded");
        assert_eq!(health.tone, Tone::Red);
        assert_eq!(summary.cards[0].value, "None");
        assert_eq!(summary.cards[2].sub, "No claims on record");
    }

    #[test]
    fn unreported_health_counts_as_degraded() {
        let sources = OverviewSources {
            chaos: serde_json::from_value(serde_json::json!({
                "services": {"claims": {"healthy": true}, "policy": {}, "investment": {"healthy": false}}
            }))
            .ok(),
            portfolio: serde_json::from_value(serde_json::json!({
                "totalValue": 125000.4, "holdings": [{"symbol": "A"}, {"symbol": "B"}]
            }))
            .ok(),
            ..OverviewSources::default()
        };

        let summary = summarize(&sources, "CUST001", 4);
        assert_eq!(summary.cards[1].value, "$125,000");
        assert_eq!(summary.cards[1].sub, "2 holdings");
        assert_eq!(summary.cards[3].value, "1/3");
        assert_eq!(summary.cards[3].sub, "2 service(s) degraded");
    }
}
