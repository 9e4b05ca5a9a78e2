use leptos::prelude::*;

use super::feed::{rand_simple, use_event_feed};
use crate::components::telemetry_canvas::TelemetryCanvas;
use crate::telemetry::{Entity, EntityRole, HitTarget, LayoutStrategy, Snapshot};

const SUBNETS: &[&str] = &["10.0.1", "10.0.2", "10.0.7", "172.16.4"];
const SERVICES: &[&str] = &["auth-api", "payments", "dns", "s3-gateway", "ssh-bastion"];

/// Source hosts grouped by subnet, destinations by service.
fn flow_snapshot() -> Snapshot {
	let mut entities = Vec::new();
	for (s, subnet) in SUBNETS.iter().enumerate() {
		for host in 0..4 {
			let seed = (s * 10 + host) as u64;
			entities.push(
				Entity::new(format!("{subnet}.{}", 10 + host * 7), EntityRole::Source, rand_simple(seed) * 0.6)
					.with_group(*subnet)
					.with_category("host"),
			);
		}
	}
	for (i, service) in SERVICES.iter().enumerate() {
		entities.push(
			Entity::new(*service, EntityRole::Destination, rand_simple(100 + i as u64)).with_category("service"),
		);
	}
	Snapshot::new(entities, Vec::new())
}

fn flow_routes() -> Vec<(String, String)> {
	SUBNETS
		.iter()
		.flat_map(|subnet| SERVICES.iter().map(move |service| (subnet.to_string(), service.to_string())))
		.collect()
}

/// Packet-flow view: subnets on the left, services on the right.
#[component]
pub fn Home() -> impl IntoView {
	let snapshot = Signal::derive(flow_snapshot);
	let events = use_event_feed(flow_routes(), 180);
	let selected = RwSignal::new(None::<HitTarget>);
	let paused = RwSignal::new(false);

	view! {
		<div class="fullscreen-graph">
			<TelemetryCanvas
				snapshot=snapshot
				events=events
				strategy=LayoutStrategy::Clusters
				fullscreen=true
				paused=paused
				on_select=Some(Callback::new(move |hit: HitTarget| selected.set(Some(hit))))
			/>
			<div class="graph-overlay">
				<h1>"Packet Flows"</h1>
				<p class="subtitle">"Subnets send to services. Color tracks risk. Click a cluster or packet."</p>
				<p class="selection">
					{move || {
						selected
							.get()
							.map(|hit| format!("selected {:?} {}", hit.kind, hit.id))
							.unwrap_or_default()
					}}
				</p>
				<button on:click=move |_| paused.update(|p| *p = !*p)>
					{move || if paused.get() { "resume" } else { "pause" }}
				</button>
				<nav>
					<a href="/chain">"attack chain"</a>
					" · "
					<a href="/topology">"federation"</a>
				</nav>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_route_resolves_to_a_cluster_key() {
		let snapshot = flow_snapshot();
		for (source, dest) in flow_routes() {
			assert!(snapshot.entities.iter().any(|e| e.role == EntityRole::Source && e.cluster_key() == source));
			assert!(snapshot.entities.iter().any(|e| e.role == EntityRole::Destination && e.cluster_key() == dest));
		}
	}
}
