//! Process-wide configuration, assembled in one place instead of being
//! scattered through the code as literals. WiFi credentials come from the
//! build environment.

pub(crate) struct WifiConfig {
    pub ssid: &'static str,
    pub password: &'static str,
}

pub(crate) struct DeviceConfig {
    pub hostname: &'static str,
    pub instance: &'static str,
    pub http_port: u16,
}

pub(crate) struct MdnsConfig {
    pub service: &'static str,
    pub ttl_secs: u32,
}

pub(crate) struct ButtonConfig {
    pub short_press_ms: u32,
    pub long_press_ms: u32,
}

pub(crate) const WIFI: WifiConfig = WifiConfig {
    ssid: env!("WIFI_SSID"),
    password: env!("WIFI_PASSWORD"),
};

pub(crate) const DEVICE: DeviceConfig = DeviceConfig {
    hostname: "esp32",
    instance: "ESP32 Web Switch",
    http_port: 80,
};

pub(crate) const MDNS: MdnsConfig = MdnsConfig {
    service: "_http._tcp",
    ttl_secs: 120,
};

pub(crate) const BUTTON: ButtonConfig = ButtonConfig {
    short_press_ms: 500,
    long_press_ms: 5000,
};

/// Relay output, wired in parallel with the physical power button.
#[macro_export]
macro_rules! relay_gpio {
    ($p:expr) => {
        $p.GPIO12
    };
}

/// Activity indicator LED, mirrors the relay while a pulse is held.
#[macro_export]
macro_rules! indicator_gpio {
    ($p:expr) => {
        $p.GPIO14
    };
}
