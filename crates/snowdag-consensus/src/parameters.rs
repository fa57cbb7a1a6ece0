//! Consensus parameters.

/// Parameters for the sampling/voting protocol.
#[derive(Debug, Clone, Copy)]
pub struct Parameters {
    /// Sample size (k) - peers polled per transaction query.
    pub k: usize,

    /// Quorum threshold (alpha) as a fraction of the sample; a query
    /// round succeeds when `votes >= alpha * sampled`.
    pub alpha: f64,

    /// Confidence a transaction must exceed for the uncontested
    /// acceptance path.
    pub beta1: u64,

    /// Consecutive-stability count a preference must exceed for the
    /// contested acceptance path.
    pub beta2: u64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            k: 10,
            alpha: 0.8,
            beta1: 11,
            beta2: 150,
        }
    }
}

impl Parameters {
    /// Creates new parameters with the given values.
    pub fn new(k: usize, alpha: f64, beta1: u64, beta2: u64) -> Self {
        Self {
            k,
            alpha,
            beta1,
            beta2,
        }
    }

    /// Validates the parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.k == 0 {
            return Err("k must be positive".to_string());
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err("alpha must be in (0, 1]".to_string());
        }
        if self.beta1 == 0 {
            return Err("beta1 must be positive".to_string());
        }
        if self.beta2 == 0 {
            return Err("beta2 must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_valid() {
        let params = Parameters::default();
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_invalid_k() {
        let params = Parameters {
            k: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_invalid_alpha() {
        let params = Parameters {
            alpha: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = Parameters {
            alpha: 1.5,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = Parameters {
            alpha: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_invalid_beta() {
        let params = Parameters {
            beta1: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = Parameters {
            beta2: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
