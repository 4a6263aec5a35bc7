use std::env;

fn main() {
    // Build-time defaults for the network settings. They are used when the
    // persisted settings block fails its checksum and the node falls back to
    // default-initialized configuration.

    // Node hostname (also the RS-485 address and the soft-AP SSID)
    if let Ok(hostname) = env::var("NODE_HOSTNAME") {
        println!("cargo:rustc-env=NODE_HOSTNAME={}", hostname);
    } else {
        println!("cargo:rustc-env=NODE_HOSTNAME=telemnode");
    }

    // WiFi SSID (network name)
    if let Ok(ssid) = env::var("WIFI_SSID") {
        println!("cargo:rustc-env=WIFI_SSID={}", ssid);
    } else {
        println!("cargo:rustc-env=WIFI_SSID=");
    }

    // WiFi password
    if let Ok(password) = env::var("WIFI_PASSWORD") {
        println!("cargo:rustc-env=WIFI_PASSWORD={}", password);
    } else {
        println!("cargo:rustc-env=WIFI_PASSWORD=");
    }

    println!("cargo:rerun-if-env-changed=NODE_HOSTNAME");
    println!("cargo:rerun-if-env-changed=WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WIFI_PASSWORD");
}
