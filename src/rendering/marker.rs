use crate::core::geo::{LatLng, Point};
use crate::rendering::engine::{FeatureProperties, MapEngine, MarkerId, MarkerLayer};
use crate::Result;

/// Exclusive handle to the marker feature living inside the engine.
///
/// The handle is not `Clone`; it must be released with [`MarkerHandle::destroy`]
/// before the engine goes away.
#[derive(Debug)]
pub struct MarkerHandle {
    id: MarkerId,
    live: bool,
}

impl MarkerHandle {
    pub fn create(engine: &mut dyn MapEngine, lat_lng: LatLng) -> Result<Self> {
        let id = engine.create_marker(lat_lng)?;
        log::debug!("created marker feature {:?}", id);
        Ok(Self { id, live: true })
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn update(
        &self,
        engine: &mut dyn MapEngine,
        lat_lng: LatLng,
        properties: &FeatureProperties,
    ) {
        engine.update_marker(self.id, lat_lng, properties);
    }

    pub fn set_layer_visibility(&self, engine: &mut dyn MapEngine, layer: MarkerLayer, visible: bool) {
        engine.set_marker_layer_visibility(self.id, layer, visible);
    }

    pub fn hit_test(&self, engine: &dyn MapEngine, point: Point) -> bool {
        engine.query_marker_at(self.id, point, &MarkerLayer::CLICKABLE)
    }

    pub fn destroy(mut self, engine: &mut dyn MapEngine) {
        engine.destroy_marker(self.id);
        self.live = false;
        log::debug!("destroyed marker feature {:?}", self.id);
    }
}

impl Drop for MarkerHandle {
    fn drop(&mut self) {
        if self.live {
            log::warn!("marker feature {:?} dropped without being destroyed", self.id);
        }
    }
}
