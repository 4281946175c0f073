// UPnP service identifiers used by the built-in operations.

/// The controller itself: scene runs, Lua execution, plugin installs.
pub const HOME_AUTOMATION_GATEWAY: &str = "urn:micasaverde-com:serviceId:HomeAutomationGateway1";

/// Binary on/off switches (`SetTarget`, `Status`).
pub const SWITCH_POWER: &str = "urn:upnp-org:serviceId:SwitchPower1";
