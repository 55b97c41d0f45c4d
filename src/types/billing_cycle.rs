use std::{fmt, io, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingCycle {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BillingCycle::Weekly => write!(f, "weekly"),
            BillingCycle::Biweekly => write!(f, "biweekly"),
            BillingCycle::Monthly => write!(f, "monthly"),
            BillingCycle::Quarterly => write!(f, "quarterly"),
            BillingCycle::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for BillingCycle {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<BillingCycle, Self::Err> {
        match value {
            "weekly" => Ok(BillingCycle::Weekly),
            "biweekly" => Ok(BillingCycle::Biweekly),
            "monthly" => Ok(BillingCycle::Monthly),
            "quarterly" => Ok(BillingCycle::Quarterly),
            "yearly" => Ok(BillingCycle::Yearly),
            _ => Err(io::Error::other("Billing cycle not supported")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billing_cycle_round_trip() {
        for cycle in [
            BillingCycle::Weekly,
            BillingCycle::Biweekly,
            BillingCycle::Monthly,
            BillingCycle::Quarterly,
            BillingCycle::Yearly,
        ] {
            let parsed = BillingCycle::from_str(&cycle.to_string()).unwrap();
            assert_eq!(parsed, cycle);
        }
    }

    #[test]
    fn test_billing_cycle_rejects_unknown() {
        assert!(BillingCycle::from_str("daily").is_err());
        assert!(BillingCycle::from_str("Monthly").is_err());
        assert!(BillingCycle::from_str("").is_err());
    }
}
