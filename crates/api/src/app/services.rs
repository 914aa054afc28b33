//! Repository bundle shared by all handlers.

use contaerp_store::Database;
use contaerp_store::repo::catalog::{CategoryRepo, ProductRepo, UnitRepo};
use contaerp_store::repo::dashboard::DashboardRepo;
use contaerp_store::repo::financial::{
    BankAccountRepo, BankRepo, CashMovementRepo, PayableRepo, PaymentMethodRepo, ReceivableRepo,
};
use contaerp_store::repo::inventory::StockRepo;
use contaerp_store::repo::ledger::{ChartAccountRepo, CostCenterRepo};
use contaerp_store::repo::parties::{CustomerRepo, EmployeeRepo, PersonRepo, SupplierRepo};
use contaerp_store::repo::tenancy::{CompanyRepo, SettingRepo};
use contaerp_store::repo::users::UserRepo;

#[derive(Debug, Clone)]
pub struct AppServices {
    pub db: Database,
    pub users: UserRepo,
    pub companies: CompanyRepo,
    pub settings: SettingRepo,
    pub people: PersonRepo,
    pub customers: CustomerRepo,
    pub suppliers: SupplierRepo,
    pub employees: EmployeeRepo,
    pub categories: CategoryRepo,
    pub units: UnitRepo,
    pub products: ProductRepo,
    pub accounts: ChartAccountRepo,
    pub cost_centers: CostCenterRepo,
    pub banks: BankRepo,
    pub bank_accounts: BankAccountRepo,
    pub payment_methods: PaymentMethodRepo,
    pub receivables: ReceivableRepo,
    pub payables: PayableRepo,
    pub cash_movements: CashMovementRepo,
    pub stock: StockRepo,
    pub dashboard: DashboardRepo,
}

impl AppServices {
    pub fn new(db: Database) -> Self {
        Self {
            users: UserRepo::new(&db),
            companies: CompanyRepo::new(&db),
            settings: SettingRepo::new(&db),
            people: PersonRepo::new(&db),
            customers: CustomerRepo::new(&db),
            suppliers: SupplierRepo::new(&db),
            employees: EmployeeRepo::new(&db),
            categories: CategoryRepo::new(&db),
            units: UnitRepo::new(&db),
            products: ProductRepo::new(&db),
            accounts: ChartAccountRepo::new(&db),
            cost_centers: CostCenterRepo::new(&db),
            banks: BankRepo::new(&db),
            bank_accounts: BankAccountRepo::new(&db),
            payment_methods: PaymentMethodRepo::new(&db),
            receivables: ReceivableRepo::new(&db),
            payables: PayableRepo::new(&db),
            cash_movements: CashMovementRepo::new(&db),
            stock: StockRepo::new(&db),
            dashboard: DashboardRepo::new(&db),
            db,
        }
    }
}
