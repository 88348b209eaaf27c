/// A single compounding balance with its own annual return rate. The
/// balance can be driven to zero but never below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapitalAccount {
    balance: f64,
    annual_return_rate: f64,
}

impl CapitalAccount {
    pub fn new(balance: f64, annual_return_rate: f64) -> Self {
        Self {
            balance: balance.max(0.0),
            annual_return_rate,
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn deposit(&mut self, amount: f64) {
        debug_assert!(amount >= 0.0);
        self.balance += amount;
    }

    /// Takes up to `amount` from the account and returns what was actually
    /// withdrawn; the caller computes any shortfall from the difference.
    pub fn withdraw(&mut self, amount: f64) -> f64 {
        debug_assert!(amount >= 0.0);
        let taken = amount.min(self.balance);
        self.balance -= taken;
        taken
    }

    /// Compounds one year of return and reports the gain (negative on a
    /// losing rate). Applied once per year, after that year's cash flows.
    pub fn apply_annual_return(&mut self) -> f64 {
        let gain = self.balance * self.annual_return_rate;
        self.balance += gain;
        gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn deposit_and_withdraw_move_the_balance() {
        let mut account = CapitalAccount::new(100.0, 0.05);
        account.deposit(50.0);
        assert!((account.balance() - 150.0).abs() <= EPS);

        let taken = account.withdraw(60.0);
        assert!((taken - 60.0).abs() <= EPS);
        assert!((account.balance() - 90.0).abs() <= EPS);
    }

    #[test]
    fn withdraw_clamps_at_zero_and_reports_partial_amount() {
        let mut account = CapitalAccount::new(40.0, 0.0);
        let taken = account.withdraw(100.0);
        assert!((taken - 40.0).abs() <= EPS);
        assert!(account.balance().abs() <= EPS);

        let taken = account.withdraw(10.0);
        assert!(taken.abs() <= EPS);
        assert!(account.balance() >= 0.0);
    }

    #[test]
    fn withdraw_exact_balance_empties_the_account() {
        let mut account = CapitalAccount::new(25.0, 0.0);
        let taken = account.withdraw(25.0);
        assert!((taken - 25.0).abs() <= EPS);
        assert!(account.balance().abs() <= EPS);
    }

    #[test]
    fn annual_return_compounds_the_balance() {
        let mut account = CapitalAccount::new(1_000.0, 0.07);
        let gain = account.apply_annual_return();
        assert!((gain - 70.0).abs() <= EPS);
        assert!((account.balance() - 1_070.0).abs() <= EPS);
    }

    #[test]
    fn negative_rate_produces_a_loss_but_not_a_negative_balance() {
        let mut account = CapitalAccount::new(200.0, -0.10);
        let gain = account.apply_annual_return();
        assert!((gain + 20.0).abs() <= EPS);
        assert!((account.balance() - 180.0).abs() <= EPS);
        assert!(account.balance() >= 0.0);
    }
}
