//! Initial schema for the conciliation board.
//!
//! Creates the case lifecycle tables, the agreement tables with their
//! type-specific detail rows, and the installment schedule tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(CASES_SQL).await?;
        db.execute_unprepared(AGREEMENTS_SQL).await?;
        db.execute_unprepared(INSTALLMENTS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE case_type AS ENUM ('compensation', 'dacao', 'exceptional_transaction');
CREATE TYPE case_status AS ENUM (
    'intake', 'under_analysis', 'scheduled', 'judged',
    'agreement_in_effect', 'suspended', 'concluded', 'archived'
);
CREATE TYPE decision_outcome AS ENUM ('granted', 'partially_granted', 'denied');
CREATE TYPE agreement_status AS ENUM ('active', 'fulfilled', 'expired', 'cancelled', 'renegotiated');
CREATE TYPE payment_method AS ENUM ('lump_sum', 'installments');
CREATE TYPE installment_type AS ENUM ('entry', 'agreement_installment', 'fee_installment');
CREATE TYPE installment_status AS ENUM ('pending', 'paid', 'overdue', 'cancelled');
CREATE TYPE registration_purpose AS ENUM (
    'included_in_agreement', 'offered_for_compensation', 'offered_for_dacao'
);
";

const CASES_SQL: &str = r"
CREATE TABLE cases (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    case_number VARCHAR(20) NOT NULL UNIQUE,
    case_type case_type NOT NULL,
    status case_status NOT NULL DEFAULT 'intake',
    taxpayer_name VARCHAR(255) NOT NULL,
    taxpayer_document VARCHAR(20) NOT NULL,
    original_value NUMERIC(14, 2) NOT NULL,
    negotiated_value NUMERIC(14, 2),
    opened_on DATE NOT NULL,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_original_value_non_negative CHECK (original_value >= 0)
);

CREATE INDEX idx_cases_status ON cases(status);
CREATE INDEX idx_cases_type ON cases(case_type);
CREATE INDEX idx_cases_taxpayer ON cases(taxpayer_document);

CREATE TABLE judgment_sessions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    session_number VARCHAR(20) NOT NULL UNIQUE,
    held_on DATE NOT NULL,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE dockets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    docket_number VARCHAR(20) NOT NULL UNIQUE,
    scheduled_for DATE NOT NULL,
    session_id UUID REFERENCES judgment_sessions(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE docket_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    docket_id UUID NOT NULL REFERENCES dockets(id) ON DELETE CASCADE,
    case_id UUID NOT NULL REFERENCES cases(id) ON DELETE RESTRICT,
    position INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_docket_case UNIQUE (docket_id, case_id)
);

CREATE INDEX idx_docket_entries_case ON docket_entries(case_id);

CREATE TABLE decisions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    case_id UUID NOT NULL REFERENCES cases(id) ON DELETE RESTRICT,
    session_id UUID REFERENCES judgment_sessions(id) ON DELETE SET NULL,
    outcome decision_outcome NOT NULL,
    decided_on DATE NOT NULL,
    summary TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_decisions_case ON decisions(case_id, decided_on DESC);
";

const AGREEMENTS_SQL: &str = r"
CREATE TABLE agreements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    case_id UUID NOT NULL REFERENCES cases(id) ON DELETE RESTRICT,
    term_number VARCHAR(20) NOT NULL UNIQUE,
    status agreement_status NOT NULL DEFAULT 'active',
    signing_date DATE NOT NULL,
    first_due_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_agreements_case ON agreements(case_id);

-- One active agreement per case, enforced alongside the in-transaction check
CREATE UNIQUE INDEX uq_agreements_active_case ON agreements(case_id) WHERE status = 'active';

CREATE TABLE agreement_compensation_details (
    agreement_id UUID PRIMARY KEY REFERENCES agreements(id) ON DELETE CASCADE,
    total_credits NUMERIC(14, 2) NOT NULL,
    total_debits NUMERIC(14, 2) NOT NULL,
    legal_costs NUMERIC(14, 2),
    fees NUMERIC(14, 2)
);

CREATE TABLE agreement_dacao_details (
    agreement_id UUID PRIMARY KEY REFERENCES agreements(id) ON DELETE CASCADE,
    total_offered NUMERIC(14, 2) NOT NULL,
    total_to_offset NUMERIC(14, 2) NOT NULL,
    legal_costs NUMERIC(14, 2),
    fees NUMERIC(14, 2)
);

CREATE TABLE agreement_transaction_details (
    agreement_id UUID PRIMARY KEY REFERENCES agreements(id) ON DELETE CASCADE,
    total_proposed NUMERIC(14, 2) NOT NULL,
    payment_method payment_method NOT NULL,
    entry_value NUMERIC(14, 2),
    installment_count INTEGER,
    installment_value NUMERIC(14, 2),
    legal_costs NUMERIC(14, 2),
    fees NUMERIC(14, 2)
);

CREATE TABLE agreement_registrations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    agreement_id UUID NOT NULL REFERENCES agreements(id) ON DELETE CASCADE,
    registration_code VARCHAR(50) NOT NULL,
    purpose registration_purpose NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_registrations_agreement ON agreement_registrations(agreement_id);

CREATE TABLE registration_debts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    registration_id UUID NOT NULL REFERENCES agreement_registrations(id) ON DELETE CASCADE,
    competence VARCHAR(10),
    posted_amount NUMERIC(14, 2) NOT NULL
);

CREATE INDEX idx_registration_debts_registration ON registration_debts(registration_id);

CREATE TABLE agreement_credits (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    agreement_id UUID NOT NULL REFERENCES agreements(id) ON DELETE CASCADE,
    description VARCHAR(255) NOT NULL,
    amount NUMERIC(14, 2) NOT NULL
);

CREATE INDEX idx_agreement_credits_agreement ON agreement_credits(agreement_id);
";

const INSTALLMENTS_SQL: &str = r"
CREATE TABLE installments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    agreement_id UUID NOT NULL REFERENCES agreements(id) ON DELETE CASCADE,
    number INTEGER NOT NULL,
    installment_type installment_type NOT NULL,
    status installment_status NOT NULL DEFAULT 'pending',
    amount NUMERIC(14, 2) NOT NULL,
    due_date DATE NOT NULL,
    payment_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_amount_non_negative CHECK (amount >= 0),
    CONSTRAINT uq_installment_number UNIQUE (agreement_id, installment_type, number)
);

CREATE INDEX idx_installments_agreement ON installments(agreement_id, due_date);
CREATE INDEX idx_installments_due ON installments(due_date) WHERE status = 'pending';

CREATE TABLE installment_payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    installment_id UUID NOT NULL REFERENCES installments(id) ON DELETE CASCADE,
    amount NUMERIC(14, 2) NOT NULL,
    paid_on DATE NOT NULL,
    method VARCHAR(50),
    receipt_number VARCHAR(50),
    observations TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_payment_positive CHECK (amount > 0)
);

CREATE INDEX idx_installment_payments_installment ON installment_payments(installment_id, paid_on);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS installment_payments CASCADE;
DROP TABLE IF EXISTS installments CASCADE;
DROP TABLE IF EXISTS agreement_credits CASCADE;
DROP TABLE IF EXISTS registration_debts CASCADE;
DROP TABLE IF EXISTS agreement_registrations CASCADE;
DROP TABLE IF EXISTS agreement_transaction_details CASCADE;
DROP TABLE IF EXISTS agreement_dacao_details CASCADE;
DROP TABLE IF EXISTS agreement_compensation_details CASCADE;
DROP TABLE IF EXISTS agreements CASCADE;
DROP TABLE IF EXISTS decisions CASCADE;
DROP TABLE IF EXISTS docket_entries CASCADE;
DROP TABLE IF EXISTS dockets CASCADE;
DROP TABLE IF EXISTS judgment_sessions CASCADE;
DROP TABLE IF EXISTS cases CASCADE;
DROP TYPE IF EXISTS registration_purpose;
DROP TYPE IF EXISTS installment_status;
DROP TYPE IF EXISTS installment_type;
DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS agreement_status;
DROP TYPE IF EXISTS decision_outcome;
DROP TYPE IF EXISTS case_status;
DROP TYPE IF EXISTS case_type;
";
