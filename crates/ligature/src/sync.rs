//! Keeping connectors attached to the shapes they connect.
//!
//! Nothing here subscribes to shape events. Whoever moves, resizes or
//! rotates a shape calls [`update_connected_lines`] (or
//! [`find_connected_lines`] followed by [`update_connector`]) afterwards.

use log::{debug, info, trace};

use ligature_core::{
    identifier::Id,
    port::{PortPreference, find_best_ports, find_port_by_id},
};

use crate::{
    connector::{RouteEnds, compute_connector_path},
    scene::Scene,
};

/// Reroutes a connector from the current geometry of its bound shapes.
///
/// Both bound ports are recomputed from the shapes, the path is rebuilt
/// (waypoints first, otherwise by routing style with obstacle avoidance) and
/// written into the existing connector, which keeps its id and scene slot.
/// A side bound to a shape without a port uses the port facing the other
/// end; an unbound side keeps its current endpoint.
///
/// Returns false without touching the scene when the connector does not
/// exist, is not bound, or one of its bound shapes or ports no longer
/// resolves.
pub fn update_connector(scene: &mut Scene, connector_id: Id) -> bool {
    let Some(connector) = scene.connector(connector_id) else {
        debug!(connector_id:%; "Connector not found, skipping update");
        return false;
    };
    let data = connector.data().clone();
    if !data.is_bound() {
        debug!(connector_id:%; "Connector is not bound to any shape, skipping update");
        return false;
    }

    let current = connector.path();
    let (Some(current_start), Some(current_end)) = (current.start(), current.end()) else {
        debug!(connector_id:%; "Connector has no geometry, skipping update");
        return false;
    };

    let source = match data.source_shape_id {
        Some(shape_id) => match scene.shape(shape_id) {
            Some(shape) => Some(shape),
            None => {
                debug!(connector_id:%, shape_id:%; "Source shape is gone, connector is stale");
                return false;
            }
        },
        None => None,
    };
    let target = match data.target_shape_id {
        Some(shape_id) => match scene.shape(shape_id) {
            Some(shape) => Some(shape),
            None => {
                debug!(connector_id:%, shape_id:%; "Target shape is gone, connector is stale");
                return false;
            }
        },
        None => None,
    };

    let best = match (source, target) {
        (Some(source), Some(target)) => {
            Some(find_best_ports(source, target, PortPreference::default()))
        }
        _ => None,
    };

    let source_port = match (source, data.source_port) {
        (Some(shape), Some(port_id)) => match find_port_by_id(shape, port_id) {
            Some(port) => Some(port),
            None => {
                debug!(connector_id:%, port_id:%; "Source port does not resolve");
                return false;
            }
        },
        (Some(_), None) => best.map(|(port, _)| port),
        (None, _) => None,
    };
    let target_port = match (target, data.target_port) {
        (Some(shape), Some(port_id)) => match find_port_by_id(shape, port_id) {
            Some(port) => Some(port),
            None => {
                debug!(connector_id:%, port_id:%; "Target port does not resolve");
                return false;
            }
        },
        (Some(_), None) => best.map(|(_, port)| port),
        (None, _) => None,
    };

    let ends = RouteEnds {
        start: source_port.map_or(current_start, |port| port.point()),
        end: target_port.map_or(current_end, |port| port.point()),
        start_port: source_port.map(|port| port.position()),
        end_port: target_port.map(|port| port.position()),
    };
    let path = compute_connector_path(scene, &data, ends, true);
    trace!(connector_id:%, path:% = path; "Connector rerouted");

    let Some(connector) = scene.connector_mut(connector_id) else {
        return false;
    };
    connector.set_path(path);
    scene.render_all();
    true
}

/// Connectors bound to `shape_id` at either end, in scene order.
pub fn find_connected_lines(scene: &Scene, shape_id: Id) -> Vec<Id> {
    scene
        .connectors()
        .filter(|connector| connector.data().is_connected_to(shape_id))
        .map(|connector| connector.id())
        .collect()
}

/// Reroutes every connector bound to `shape_id`.
///
/// Returns the number of connectors that were updated.
pub fn update_connected_lines(scene: &mut Scene, shape_id: Id) -> usize {
    let updated = find_connected_lines(scene, shape_id)
        .into_iter()
        .filter(|&connector_id| update_connector(scene, connector_id))
        .count();
    info!(shape_id:%, updated; "Connected lines updated");
    updated
}
