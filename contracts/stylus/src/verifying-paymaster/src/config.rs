//! Owner-gated paymaster configuration.

use stylus_sdk::alloy_primitives::Address;

use crate::errors::ConfigError;

/// Who owns the paymaster, whose signature authorizes sponsorship, and where token payments go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaymasterConfig {
    pub owner: Address,
    pub verifier: Address,
    pub vault: Address,
}

impl PaymasterConfig {
    /// Verifier and vault start out as the owner.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            verifier: owner,
            vault: owner,
        }
    }

    pub fn set_verifier(&mut self, caller: Address, verifier: Address) -> Result<(), ConfigError> {
        self.ensure_owner(caller)?;
        self.verifier = verifier;
        Ok(())
    }

    pub fn set_vault(&mut self, caller: Address, vault: Address) -> Result<(), ConfigError> {
        self.ensure_owner(caller)?;
        self.vault = vault;
        Ok(())
    }

    pub fn ensure_owner(&self, caller: Address) -> Result<(), ConfigError> {
        if caller != self.owner {
            return Err(ConfigError::Unauthorized { caller });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: Address = Address::new([0x01; 20]);
    const STRANGER: Address = Address::new([0x02; 20]);
    const NEW_KEY: Address = Address::new([0x03; 20]);

    #[test]
    fn defaults_to_owner() {
        let config = PaymasterConfig::new(OWNER);
        assert_eq!(config.verifier, OWNER);
        assert_eq!(config.vault, OWNER);
    }

    #[test]
    fn owner_can_update() {
        let mut config = PaymasterConfig::new(OWNER);
        config.set_verifier(OWNER, NEW_KEY).unwrap();
        assert_eq!(config.verifier, NEW_KEY);
        assert_eq!(config.vault, OWNER);

        config.set_vault(OWNER, NEW_KEY).unwrap();
        assert_eq!(config.vault, NEW_KEY);
        assert_eq!(config.owner, OWNER);
    }

    #[test]
    fn stranger_cannot_update() {
        let mut config = PaymasterConfig::new(OWNER);
        let before = config;

        assert_eq!(
            config.set_verifier(STRANGER, NEW_KEY),
            Err(ConfigError::Unauthorized { caller: STRANGER })
        );
        assert_eq!(
            config.set_vault(STRANGER, NEW_KEY),
            Err(ConfigError::Unauthorized { caller: STRANGER })
        );
        assert_eq!(config, before);
    }

    #[test]
    fn verifier_cannot_update() {
        let mut config = PaymasterConfig::new(OWNER);
        config.set_verifier(OWNER, NEW_KEY).unwrap();
        assert!(config.set_vault(NEW_KEY, NEW_KEY).is_err());
        assert_eq!(config.vault, OWNER);
    }
}
