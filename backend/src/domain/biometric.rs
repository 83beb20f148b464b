use async_trait::async_trait;

/// Device biometric capability. The actual platform integration lives
/// outside this crate; services only ever see this seam.
#[async_trait]
pub trait BiometricCapability: Send + Sync {
    /// Whether the device can perform a biometric unlock right now.
    async fn is_available(&self) -> bool;
}

/// Adapter for hosts with no biometric hardware.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBiometrics;

#[async_trait]
impl BiometricCapability for NoBiometrics {
    async fn is_available(&self) -> bool {
        false
    }
}
