use std::collections::HashMap;

use futures_util::future::join_all;
use pca9685::{FullLevel, Pca9685, Pca9685DeviceConfig};
use pca9685_core::{BuildError, BusChannel, OpenBus, SharedBusLock};
use pca9685_rpi::RpiBus;
use serde::Deserialize;
use tokio::task::spawn_blocking;
use tracing::{debug, error, info, warn};

#[derive(Deserialize, Debug, Default)]
pub struct Metadata {
    pub name: Option<String>,
    pub description: Option<String>,
}

///Top level config file: which chips to bring up and what to do with them afterwards.
#[derive(Deserialize, Debug)]
pub struct CtlConfig {
    #[serde(default)]
    pub metadata: Metadata,
    //keep the outputs running until Ctrl-C
    #[serde(default)]
    pub hold: bool,
    //force every output full off before closing
    #[serde(default)]
    pub release_on_exit: bool,
    #[serde(default)]
    pub devices: Vec<Pca9685DeviceConfig>,
}

struct OpenDevice<B> {
    label: String,
    device: Pca9685<B, SharedBusLock>,
}

impl CtlConfig {
    ///One lock per distinct bus path, shared by every device on that bus.
    pub fn bus_locks(&self) -> HashMap<String, SharedBusLock> {
        let mut locks = HashMap::new();
        for device in &self.devices {
            locks
                .entry(device.bus.clone())
                .or_insert_with(SharedBusLock::new);
        }
        locks
    }

    pub async fn start(self) -> Result<(), BuildError> {
        self.run::<RpiBus>().await
    }

    pub async fn run<B>(self) -> Result<(), BuildError>
    where
        B: OpenBus + Send + 'static,
        B::Error: Send + 'static,
    {
        if self.devices.is_empty() {
            return Err(BuildError::message("no PCA9685 devices configured"));
        }
        let locks = self.bus_locks();
        let devices = open_devices::<B>(locks, self.devices).await?;
        info!("{} PCA9685 device(s) configured", devices.len());

        if self.hold {
            info!("holding outputs, press Ctrl-C to exit");
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("could not wait for Ctrl-C: {}", err);
            }
        }

        close_devices(devices, self.release_on_exit).await
    }
}

async fn open_devices<B>(
    locks: HashMap<String, SharedBusLock>,
    configs: Vec<Pca9685DeviceConfig>,
) -> Result<Vec<OpenDevice<B>>, BuildError>
where
    B: OpenBus + Send + 'static,
    B::Error: Send + 'static,
{
    let (labels, handles): (Vec<_>, Vec<_>) = configs
        .into_iter()
        .map(|config| {
            let lock = locks.get(&config.bus).cloned().unwrap_or_default();
            let label = format!("{:#04x} on {}", config.i2c_address, config.bus);
            // i2c transfers block
            let handle = spawn_blocking(move || config.open::<B, _>(lock));
            (label, handle)
        })
        .unzip();

    let mut devices = Vec::with_capacity(handles.len());
    let mut errs = Vec::new();
    for (label, res) in labels.into_iter().zip(join_all(handles).await) {
        match res {
            Ok(Ok(device)) => {
                debug!("PCA9685 {} ready", label);
                devices.push(OpenDevice { label, device });
            }
            Ok(Err(err)) => {
                error!("PCA9685 {} failed: {:?}", label, err);
                errs.push(BuildError::from(err));
            }
            Err(join_err) => errs.push(BuildError::from_string(format!(
                "PCA9685 {} setup task failed: {}",
                label, join_err
            ))),
        }
    }

    if errs.is_empty() {
        Ok(devices)
    } else {
        // close whatever did come up before reporting
        if let Err(err) = close_devices(devices, false).await {
            errs.push(err);
        }
        Err(BuildError::from_errs(errs))
    }
}

async fn close_devices<B>(devices: Vec<OpenDevice<B>>, release: bool) -> Result<(), BuildError>
where
    B: BusChannel + Send + 'static,
    B::Error: Send + 'static,
{
    let handles = devices.into_iter().map(|OpenDevice { label, mut device }| {
        spawn_blocking(move || {
            if release {
                if let Err(err) = device.set_all_channels_full(FullLevel::Off) {
                    warn!("could not release outputs of PCA9685 {}: {:?}", label, err);
                }
            }
            let status = device.close();
            (label, status)
        })
    });

    let mut errs = Vec::new();
    for res in join_all(handles).await {
        match res {
            Ok((label, Ok(()))) => debug!("closed PCA9685 {}", label),
            Ok((label, Err(err))) => errs.push(BuildError::from_string(format!(
                "Could not close PCA9685 {}: {:?}",
                label, err
            ))),
            Err(join_err) => errs.push(BuildError::from_string(format!(
                "PCA9685 close task failed: {}",
                join_err
            ))),
        }
    }

    if errs.is_empty() {
        Ok(())
    } else {
        Err(BuildError::from_errs(errs))
    }
}
