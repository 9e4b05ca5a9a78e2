use leptos::prelude::*;

use super::feed::use_event_feed;
use crate::components::telemetry_canvas::TelemetryCanvas;
use crate::telemetry::{Edge, Entity, EntityRole, EntityStatus, HitTarget, LayoutStrategy, Snapshot};

const STAGES: &[(&str, f64)] = &[
	("recon", 0.2),
	("phishing", 0.45),
	("vuln-scan", 0.35),
	("initial-access", 0.7),
	("exploit", 0.75),
	("priv-esc", 0.85),
	("lateral-move", 0.8),
	("exfiltration", 0.95),
];

const LINKS: &[(&str, &str, &str)] = &[
	("recon", "phishing", "osint"),
	("recon", "vuln-scan", "asset list"),
	("phishing", "initial-access", "credential"),
	("vuln-scan", "exploit", "CVE"),
	("exploit", "initial-access", "shell"),
	("initial-access", "priv-esc", "token"),
	("priv-esc", "lateral-move", "admin"),
	("initial-access", "lateral-move", "pivot"),
	("lateral-move", "exfiltration", "data"),
];

fn chain_snapshot() -> Snapshot {
	let entities = STAGES
		.iter()
		.map(|(id, score)| {
			let entity = Entity::new(*id, EntityRole::Node, *score).with_category("technique");
			match *score {
				s if s >= 0.9 => entity.with_status(EntityStatus::Compromised),
				s if s >= 0.7 => entity.with_status(EntityStatus::Degraded),
				_ => entity,
			}
		})
		.collect();
	let edges = LINKS
		.iter()
		.map(|(from, to, label)| Edge::new(*from, *to).labelled(*label))
		.collect();
	Snapshot::new(entities, edges)
}

/// Causal attack chain, top to bottom.
#[component]
pub fn AttackChain() -> impl IntoView {
	let snapshot = Signal::derive(chain_snapshot);
	let routes = LINKS
		.iter()
		.map(|(from, to, _)| (from.to_string(), to.to_string()))
		.collect();
	let events = use_event_feed(routes, 400);
	let hovered = RwSignal::new(None::<HitTarget>);

	view! {
		<div class="fullscreen-graph">
			<TelemetryCanvas
				snapshot=snapshot
				events=events
				strategy=LayoutStrategy::Layered
				fullscreen=true
				on_hover=Some(Callback::new(move |hit: Option<HitTarget>| hovered.set(hit)))
			/>
			<div class="graph-overlay">
				<h1>"Attack Chain"</h1>
				<p class="subtitle">
					{move || hovered.get().map(|hit| hit.id).unwrap_or_else(|| "Hover a technique".into())}
				</p>
			</div>
		</div>
	}
}
