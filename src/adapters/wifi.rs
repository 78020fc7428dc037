//! Soft-AP for the configuration page (device only).

use anyhow::anyhow;
use embedded_svc::wifi::{AccessPointConfiguration, AuthMethod, Configuration};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::info;

pub const AP_SSID: &str = "LightConfig";
pub const AP_PASSWORD: &str = "password";
const AP_CHANNEL: u8 = 1;

/// Bring up the access point and wait until its netif is ready.
///
/// The returned driver must be kept alive for the AP to stay up.
pub fn start_soft_ap(
    modem: Modem,
    sysloop: EspSystemEventLoop,
) -> anyhow::Result<BlockingWifi<EspWifi<'static>>> {
    let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sysloop.clone(), None)?, sysloop)?;

    wifi.set_configuration(&Configuration::AccessPoint(AccessPointConfiguration {
        ssid: AP_SSID
            .try_into()
            .map_err(|_| anyhow!("AP SSID too long"))?,
        password: AP_PASSWORD
            .try_into()
            .map_err(|_| anyhow!("AP password too long"))?,
        auth_method: AuthMethod::WPA2Personal,
        channel: AP_CHANNEL,
        ..Default::default()
    }))?;
    wifi.start()?;
    wifi.wait_netif_up()?;

    let ip = wifi.wifi().ap_netif().get_ip_info()?.ip;
    info!("WiFi: soft-AP `{}` up at {}", AP_SSID, ip);
    Ok(wifi)
}
