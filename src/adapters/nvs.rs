//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ConfigPort`] for [`LightConfig`]. The config is stored as a
//! single postcard blob; every save is validated first and every load is
//! validated again so a blob written by an older build with looser ranges
//! cannot smuggle bad timing into the control loop.
//!
//! Off-target the adapter keeps blobs in memory (simulation backend).

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::LightConfig;
use crate::error;
use log::{info, warn};

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use core::ffi::CStr;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
const CONFIG_NAMESPACE: &CStr = c"light_config";
#[cfg(target_os = "espidf")]
const CONFIG_KEY: &CStr = c"lightcfg";

#[cfg(not(target_os = "espidf"))]
const CONFIG_KEY: &str = "light_config::lightcfg";

const MAX_BLOB_SIZE: usize = 256;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: std::cell::RefCell<HashMap<&'static str, Vec<u8>>>,
}

impl NvsAdapter {
    /// Initialise NVS flash.
    ///
    /// A partition with no free pages or from a newer IDF is erased and
    /// re-initialised. Any other failure surfaces the IDF status code.
    pub fn new() -> error::Result<Self> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from the main task before any NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                let erased = unsafe { nvs_flash_erase() };
                if erased != ESP_OK {
                    return Err(error::Error::Io(erased));
                }
                let ret = unsafe { nvs_flash_init() };
                if ret != ESP_OK {
                    return Err(error::Error::Io(ret));
                }
            } else if ret != ESP_OK {
                return Err(error::Error::Io(ret));
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: std::cell::RefCell::new(HashMap::new()),
        })
    }

    /// Load the stored config, falling back to defaults on any failure.
    pub fn load_or_default(&self) -> LightConfig {
        match self.load() {
            Ok(cfg) => cfg,
            Err(ConfigError::NotFound) => {
                info!("NvsAdapter: no stored config, using defaults");
                LightConfig::default()
            }
            Err(e) => {
                warn!("NvsAdapter: {}, using defaults", e);
                LightConfig::default()
            }
        }
    }

    /// Open the config namespace, run `f` with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };
        let mut handle: nvs_handle_t = 0;
        let ret = unsafe { nvs_open(CONFIG_NAMESPACE.as_ptr(), mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }
        let result = f(handle);
        unsafe { nvs_close(handle) };
        result
    }

    #[cfg(target_os = "espidf")]
    fn read_blob(&self) -> Result<Vec<u8>, ConfigError> {
        let result = Self::with_nvs_handle(false, |handle| {
            let mut size: usize = 0;
            let ret = unsafe {
                nvs_get_blob(handle, CONFIG_KEY.as_ptr(), core::ptr::null_mut(), &mut size)
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            if size == 0 || size > MAX_BLOB_SIZE {
                return Err(ESP_ERR_NVS_INVALID_LENGTH);
            }
            let mut buf = vec![0u8; size];
            let ret = unsafe {
                nvs_get_blob(handle, CONFIG_KEY.as_ptr(), buf.as_mut_ptr().cast(), &mut size)
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(buf)
        });
        match result {
            Ok(buf) => Ok(buf),
            // An unopened namespace reports NOT_FOUND too.
            Err(e) if e == ESP_ERR_NVS_NOT_FOUND => Err(ConfigError::NotFound),
            Err(e) if e == ESP_ERR_NVS_INVALID_LENGTH => Err(ConfigError::Corrupted),
            Err(e) => {
                warn!("NvsAdapter: NVS read error {}", e);
                Err(ConfigError::IoError)
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_blob(&self) -> Result<Vec<u8>, ConfigError> {
        let store = self.store.borrow();
        let bytes = store.get(CONFIG_KEY).ok_or(ConfigError::NotFound)?;
        if bytes.len() > MAX_BLOB_SIZE {
            return Err(ConfigError::Corrupted);
        }
        Ok(bytes.clone())
    }

    #[cfg(target_os = "espidf")]
    fn write_blob(&self, bytes: &[u8]) -> Result<(), ConfigError> {
        Self::with_nvs_handle(true, |handle| {
            let ret = unsafe {
                nvs_set_blob(handle, CONFIG_KEY.as_ptr(), bytes.as_ptr().cast(), bytes.len())
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(())
        })
        .map_err(|e| {
            warn!("NvsAdapter: NVS write error {}", e);
            ConfigError::IoError
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_blob(&self, bytes: &[u8]) -> Result<(), ConfigError> {
        self.store.borrow_mut().insert(CONFIG_KEY, bytes.to_vec());
        Ok(())
    }

    /// Overwrite the stored blob with raw bytes (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn store_raw(&self, bytes: &[u8]) {
        self.store.borrow_mut().insert(CONFIG_KEY, bytes.to_vec());
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<LightConfig, ConfigError> {
        let bytes = self.read_blob()?;
        let cfg: LightConfig = postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        info!("NvsAdapter: loaded config ({} bytes)", bytes.len());
        Ok(cfg)
    }

    fn save(&self, config: &LightConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        self.write_blob(&bytes)?;
        info!("NvsAdapter: config saved ({} bytes)", bytes.len());
        Ok(())
    }
}
