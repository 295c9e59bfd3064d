//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements    | Connects to                      |
//! |----------------|---------------|----------------------------------|
//! | `hardware`     | ActuatorPort  | motor / servo / feeder drivers   |
//! | `log_sink`     | EventSink     | Serial log output                |
//! | `time`         | Clock         | ESP32 system timer               |
//! | `remote_link`  | RemoteLink    | inbound queue + publisher        |
//! | `mqtt`         | Publisher     | ESP-IDF MQTT client              |

pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod remote_link;
pub mod time;
