use std::fmt;

use super::connector::ApiConnector;
use super::error::NacError;
use crate::domain::{
    AreaOfService, DeviceIdentity, NetworkIdentifier, SliceInfo, SliceParams, SliceState,
    ValidationError,
};
use crate::transport::{
    SliceData, decode_slice, decode_slices, encode_attachment, encode_create_slice,
};

const SLICE_BASE: &str = "slice/v1";

/// Client for network slices.
#[derive(Debug, Clone)]
pub struct Slices {
    connector: ApiConnector,
}

impl Slices {
    pub(crate) fn new(connector: ApiConnector) -> Self {
        Self { connector }
    }

    /// Submit a slice order. The returned slice usually starts out
    /// `PENDING`; poll with [`Slice::refresh`] until it becomes `AVAILABLE`.
    pub async fn create(&self, params: &SliceParams) -> Result<Slice, NacError> {
        let body = encode_create_slice(params);
        let response = self.connector.post(&format!("{SLICE_BASE}/slices"), body).await?;
        let data = decode_slice(&response)?;
        Ok(Slice::bind(self.clone(), data))
    }

    /// Fetch a single slice by its server-assigned id.
    pub async fn get(&self, id: &str) -> Result<Slice, NacError> {
        let response = self.connector.get(&format!("{SLICE_BASE}/slices/{id}")).await?;
        let data = decode_slice(&response)?;
        Ok(Slice::bind(self.clone(), data))
    }

    /// List every slice visible to the caller.
    pub async fn get_all(&self) -> Result<Vec<Slice>, NacError> {
        let response = self.connector.get(&format!("{SLICE_BASE}/slices")).await?;
        let slices = decode_slices(&response)?;
        Ok(slices
            .into_iter()
            .map(|data| Slice::bind(self.clone(), data))
            .collect())
    }

    pub(crate) async fn activate(&self, id: &str) -> Result<(), NacError> {
        self.connector
            .post(
                &format!("{SLICE_BASE}/slices/{id}/activate"),
                serde_json::json!({}),
            )
            .await?;
        Ok(())
    }

    pub(crate) async fn deactivate(&self, id: &str) -> Result<(), NacError> {
        self.connector
            .post(
                &format!("{SLICE_BASE}/slices/{id}/deactivate"),
                serde_json::json!({}),
            )
            .await?;
        Ok(())
    }

    /// Delete a slice by id.
    pub async fn delete(&self, id: &str) -> Result<(), NacError> {
        self.connector.delete(&format!("{SLICE_BASE}/slices/{id}")).await
    }

    pub(crate) async fn attach_device(
        &self,
        id: &str,
        device: &DeviceIdentity,
    ) -> Result<(), NacError> {
        self.connector
            .post(
                &format!("{SLICE_BASE}/slices/{id}/attach"),
                encode_attachment(device),
            )
            .await?;
        Ok(())
    }

    pub(crate) async fn detach_device(
        &self,
        id: &str,
        device: &DeviceIdentity,
    ) -> Result<(), NacError> {
        self.connector
            .post(
                &format!("{SLICE_BASE}/slices/{id}/detach"),
                encode_attachment(device),
            )
            .await?;
        Ok(())
    }
}

/// A network slice bound to the client that produced it.
///
/// A freshly ordered slice may not carry a server-assigned id yet; every
/// operation that needs one fails locally until the id shows up through
/// [`Slice::refresh`].
#[derive(Clone)]
pub struct Slice {
    api: Slices,
    data: SliceData,
}

impl fmt::Debug for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slice")
            .field("name", &self.data.name)
            .field("slice_id", &self.data.slice_id)
            .field("state", &self.data.state)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Slice {
    fn eq(&self, other: &Self) -> bool {
        self.data.name == other.data.name && self.data.slice_id == other.data.slice_id
    }
}

impl Slice {
    pub(crate) fn bind(api: Slices, data: SliceData) -> Self {
        Self { api, data }
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// The server-assigned id, once the order has been accepted.
    pub fn id(&self) -> Option<&str> {
        self.data.slice_id.as_deref()
    }

    pub fn state(&self) -> SliceState {
        self.data.state
    }

    pub fn network_identifier(&self) -> Option<&NetworkIdentifier> {
        self.data.network_identifier.as_ref()
    }

    pub fn slice_info(&self) -> Option<&SliceInfo> {
        self.data.slice_info.as_ref()
    }

    pub fn area_of_service(&self) -> Option<&AreaOfService> {
        self.data.area_of_service.as_ref()
    }

    pub fn max_data_connections(&self) -> Option<u64> {
        self.data.max_data_connections
    }

    pub fn max_devices(&self) -> Option<u64> {
        self.data.max_devices
    }

    fn require_id(&self) -> Result<&str, NacError> {
        self.data.slice_id.as_deref().ok_or_else(|| {
            ValidationError::MissingSliceId {
                name: self.data.name.clone(),
            }
            .into()
        })
    }

    /// Re-fetch this slice and replace the cached state.
    pub async fn refresh(&mut self) -> Result<(), NacError> {
        let id = self.require_id()?.to_owned();
        let updated = self.api.get(&id).await?;
        self.data = updated.data;
        Ok(())
    }

    /// Move the slice from `AVAILABLE` to `OPERATING`.
    pub async fn activate(&self) -> Result<(), NacError> {
        self.api.activate(self.require_id()?).await
    }

    /// Move the slice from `OPERATING` back to `AVAILABLE`.
    pub async fn deactivate(&self) -> Result<(), NacError> {
        self.api.deactivate(self.require_id()?).await
    }

    /// Delete this slice server-side and mark the cached state deleted.
    pub async fn delete(&mut self) -> Result<(), NacError> {
        let id = self.require_id()?.to_owned();
        self.api.delete(&id).await?;
        self.data.state = SliceState::Deleted;
        Ok(())
    }

    /// Attach a device to an operating slice.
    pub async fn attach(&self, device: &DeviceIdentity) -> Result<(), NacError> {
        self.api.attach_device(self.require_id()?, device).await
    }

    /// Detach a previously attached device.
    pub async fn detach(&self, device: &DeviceIdentity) -> Result<(), NacError> {
        self.api.detach_device(self.require_id()?, device).await
    }
}
