// luup-api: Async Rust client for the MiOS/Vera Luup data_request API

pub mod connector;
pub mod device;
mod dispatch;
pub mod error;
pub mod params;
pub mod request;
pub mod room;
pub mod scene;
pub mod service_ids;
pub mod transport;

pub use connector::Connector;
pub use device::{Device, DeviceService};
pub use error::Error;
pub use params::{ParamName, ParamValue, Params, translate_param_name};
pub use request::{LuupAction, OutputFormat, RequestId, RequestOptions};
pub use room::Rooms;
pub use scene::{SceneRecorder, Scenes};
pub use transport::{TlsMode, TransportConfig};
