use leptos::prelude::*;

use super::feed::use_event_feed;
use crate::components::telemetry_canvas::TelemetryCanvas;
use crate::telemetry::{Edge, Entity, EntityRole, EntityStatus, LayoutStrategy, Snapshot, trust_color};

/// Federation members and their trust in [0, 1].
const MEMBERS: &[(&str, f64)] = &[
	("hq", 0.98),
	("eu-west", 0.9),
	("us-east", 0.85),
	("ap-south", 0.6),
	("partner-a", 0.45),
	("partner-b", 0.2),
	("edge-01", 0.75),
];

const PEERINGS: &[(&str, &str)] = &[
	("hq", "eu-west"),
	("hq", "us-east"),
	("eu-west", "us-east"),
	("us-east", "hq"),
	("hq", "ap-south"),
	("ap-south", "partner-a"),
	("eu-west", "partner-b"),
	("partner-b", "edge-01"),
	("edge-01", "us-east"),
];

fn federation_snapshot() -> Snapshot {
	let entities = MEMBERS
		.iter()
		.map(|(id, trust)| {
			let member = Entity::new(*id, EntityRole::Node, 1.0 - trust).with_category("member");
			if *trust < 0.3 {
				member.with_status(EntityStatus::Compromised)
			} else if *trust < 0.5 {
				member.with_status(EntityStatus::Degraded)
			} else {
				member.with_status(EntityStatus::Healthy)
			}
		})
		.collect();
	let edges = PEERINGS.iter().map(|(a, b)| Edge::new(*a, *b)).collect();
	Snapshot::new(entities, edges)
}

/// Federation mesh; peerings form cycles so it uses the relaxed layout.
#[component]
pub fn Topology() -> impl IntoView {
	let snapshot = Signal::derive(federation_snapshot);
	let routes = PEERINGS.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect();
	let events = use_event_feed(routes, 300);

	let legend = [1.0, 0.75, 0.5, 0.25, 0.0]
		.into_iter()
		.map(|trust| {
			let style = format!("background: {}", trust_color(trust).to_css());
			view! { <span class="swatch" style=style>{format!("{trust:.2}")}</span> }
		})
		.collect_view();

	view! {
		<div class="fullscreen-graph">
			<TelemetryCanvas
				snapshot=snapshot
				events=events
				strategy=LayoutStrategy::Relaxed
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Federation Topology"</h1>
				<p class="subtitle">"Trust"</p>
				<div class="legend">{legend}</div>
			</div>
		</div>
	}
}
