//! Aggregate gradation report ("gran agregado").

use serde::{Deserialize, Serialize};

use crate::calc::{sieving_error, total_retained_mass};
use crate::kind::FormKind;
use crate::lenient;
use crate::options::{Approver, BalanceCode, OvenCode, Reviewer};
use crate::progress::{ProgressSummary, SectionStatus, display_number, has_text};
use crate::report::{Identity, Report, ReportField, TextFormat};
use crate::trials::{Reading, TrialArray};

/// Number of sieve slots in the gradation table.
pub const SIEVE_COUNT: usize = 18;

/// Sieve designations, in the fixed order of the retained-mass slots.
pub const SIEVE_LABELS: [&str; SIEVE_COUNT] = [
    "3 in", "2 1/2 in", "2 in", "1 1/2 in", "1 in", "3/4 in", "1/2 in", "3/8 in", "No. 4",
    "No. 8", "No. 10", "No. 16", "No. 30", "No. 40", "No. 50", "No. 100", "No. 200", "< 200",
];

/// An aggregate gradation test report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradationReport {
    #[serde(rename = "muestra", deserialize_with = "lenient::text")]
    pub sample_code: String,
    #[serde(rename = "numero_ot", deserialize_with = "lenient::text")]
    pub work_order_code: String,
    #[serde(rename = "fecha_ensayo", deserialize_with = "lenient::text")]
    pub test_date: String,
    #[serde(rename = "realizado_por", deserialize_with = "lenient::text")]
    pub performed_by: String,

    #[serde(rename = "tipo_muestra", deserialize_with = "lenient::text")]
    pub sample_type: String,
    #[serde(
        rename = "tamano_maximo_particula_visual_in",
        deserialize_with = "lenient::text"
    )]
    pub max_particle_size_in: String,
    #[serde(rename = "forma_particula", deserialize_with = "lenient::text")]
    pub particle_shape: String,

    #[serde(
        rename = "masa_muestra_humeda_inicial_total_global_g",
        deserialize_with = "lenient::number"
    )]
    pub global_wet_initial_mass_g: Reading,
    #[serde(
        rename = "masa_muestra_seca_global_g",
        deserialize_with = "lenient::number"
    )]
    pub global_dry_mass_g: Reading,
    #[serde(
        rename = "masa_muestra_seca_constante_global_g",
        deserialize_with = "lenient::number"
    )]
    pub global_constant_dry_mass_g: Reading,
    #[serde(
        rename = "masa_muestra_seca_lavada_global_g",
        deserialize_with = "lenient::number"
    )]
    pub global_washed_dry_mass_g: Reading,
    #[serde(
        rename = "masa_muestra_humeda_inicial_total_fraccionada_g",
        deserialize_with = "lenient::number"
    )]
    pub split_wet_initial_mass_g: Reading,
    #[serde(
        rename = "masa_muestra_seca_inicial_total_fraccionada_g",
        deserialize_with = "lenient::number"
    )]
    pub split_dry_initial_mass_g: Reading,
    #[serde(
        rename = "masa_muestra_seca_grueso_g",
        deserialize_with = "lenient::number"
    )]
    pub coarse_dry_mass_g: Reading,
    #[serde(
        rename = "masa_muestra_seca_constante_grueso_g",
        deserialize_with = "lenient::number"
    )]
    pub coarse_constant_dry_mass_g: Reading,
    #[serde(
        rename = "masa_muestra_humeda_fino_g",
        deserialize_with = "lenient::number"
    )]
    pub fine_wet_mass_g: Reading,
    #[serde(rename = "masa_muestra_seca_fino_g", deserialize_with = "lenient::number")]
    pub fine_dry_mass_g: Reading,
    #[serde(
        rename = "masa_muestra_humeda_fraccion_g",
        deserialize_with = "lenient::number"
    )]
    pub fraction_wet_mass_g: Reading,
    #[serde(
        rename = "masa_muestra_seca_fraccion_g",
        deserialize_with = "lenient::number"
    )]
    pub fraction_dry_mass_g: Reading,
    #[serde(
        rename = "masa_muestra_seca_constante_fraccion_g",
        deserialize_with = "lenient::number"
    )]
    pub fraction_constant_dry_mass_g: Reading,
    #[serde(
        rename = "contenido_humedad_fraccion_pct",
        deserialize_with = "lenient::number"
    )]
    pub fraction_moisture_pct: Reading,
    #[serde(
        rename = "masa_muestra_seca_lavada_fraccion_g",
        deserialize_with = "lenient::number"
    )]
    pub fraction_washed_dry_mass_g: Reading,

    /// Mass retained on each sieve, indexed like [`SIEVE_LABELS`].
    #[serde(rename = "masa_retenida_tamiz_g")]
    pub retained_mass_g: TrialArray<SIEVE_COUNT>,
    #[serde(rename = "masa_antes_tamizado_g", deserialize_with = "lenient::number")]
    pub mass_before_sieving_g: Reading,
    #[serde(rename = "masa_despues_tamizado_g", deserialize_with = "lenient::number")]
    pub mass_after_sieving_g: Reading,
    /// Manual override of the sieving error; the calculated value is used when empty.
    #[serde(rename = "error_tamizado_pct", deserialize_with = "lenient::number")]
    pub sieving_error_pct: Reading,

    #[serde(rename = "balanza_01g_codigo")]
    pub balance_code: BalanceCode,
    #[serde(rename = "horno_codigo")]
    pub oven_code: OvenCode,
    #[serde(rename = "observaciones", deserialize_with = "lenient::text")]
    pub notes: String,

    #[serde(rename = "revisado_por")]
    pub reviewed_by: Reviewer,
    #[serde(rename = "revisado_fecha", deserialize_with = "lenient::text")]
    pub reviewed_date: String,
    #[serde(rename = "aprobado_por")]
    pub approved_by: Approver,
    #[serde(rename = "aprobado_fecha", deserialize_with = "lenient::text")]
    pub approved_date: String,
}

/// Calculated values of a gradation report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradationDerived {
    /// Sieve slots holding a mass.
    pub filled_sieves: usize,
    /// Sum of retained masses, 3 decimals.
    pub total_retained_g: f64,
    /// Mass lost during sieving in percent, 4 decimals.
    pub sieving_error_pct: Option<f64>,
}

impl Report for GradationReport {
    const KIND: FormKind = FormKind::Gradation;
    type Field = GradationField;
    type TrialField = GradationTrialField;
    type Derived = GradationDerived;

    fn derived(&self) -> GradationDerived {
        GradationDerived {
            filled_sieves: self.retained_mass_g.filled(),
            total_retained_g: total_retained_mass(self.retained_mass_g.as_slice()),
            sieving_error_pct: sieving_error(self.mass_before_sieving_g, self.mass_after_sieving_g),
        }
    }

    fn submission(&self) -> Self {
        let mut submitted = self.clone();
        submitted.sieving_error_pct = self
            .sieving_error_pct
            .or(self.derived().sieving_error_pct);
        submitted
    }

    fn progress(&self) -> ProgressSummary {
        let header = [&self.sample_code, &self.work_order_code, &self.performed_by];
        let header_filled = header.iter().filter(|v| has_text(v)).count();
        let derived = self.derived();
        let error = self.sieving_error_pct.or(derived.sieving_error_pct);

        ProgressSummary::from_sections(vec![
            SectionStatus::new(
                "Header",
                header_filled == header.len(),
                Some(format!("{header_filled}/{}", header.len())),
            ),
            SectionStatus::new(
                "Description",
                has_text(&self.sample_type) && has_text(&self.max_particle_size_in),
                Some(if has_text(&self.particle_shape) {
                    "Shape recorded".to_string()
                } else {
                    "Shape missing".to_string()
                }),
            ),
            SectionStatus::new(
                "Masses",
                self.global_wet_initial_mass_g.is_some()
                    || self.global_dry_mass_g.is_some()
                    || self.split_wet_initial_mass_g.is_some()
                    || self.split_dry_initial_mass_g.is_some(),
                self.fraction_moisture_pct
                    .map(|m| format!("Moisture: {}%", display_number(m))),
            ),
            SectionStatus::new(
                "Sieves",
                derived.filled_sieves > 0,
                Some(format!("{}/{SIEVE_COUNT}", derived.filled_sieves)),
            ),
            SectionStatus::new(
                "Error control",
                error.is_some(),
                error.map(|e| format!("{}%", display_number(e))),
            ),
            SectionStatus::new(
                "Equipment and closure",
                self.balance_code.is_set() && self.oven_code.is_set(),
                Some(
                    if self.reviewed_by.is_set() && self.approved_by.is_set() {
                        "Signatures ready".to_string()
                    } else {
                        "Unsigned".to_string()
                    },
                ),
            ),
        ])
    }

    fn identity(&self) -> Identity<'_> {
        Identity {
            sample_code: &self.sample_code,
            work_order_code: &self.work_order_code,
            test_date: &self.test_date,
            performed_by: &self.performed_by,
        }
    }

    fn formatted_fields() -> &'static [(GradationField, TextFormat)] {
        &[
            (GradationField::SampleCode, TextFormat::SampleCode),
            (GradationField::WorkOrderCode, TextFormat::WorkOrder),
            (GradationField::TestDate, TextFormat::Date),
            (GradationField::ReviewedDate, TextFormat::Date),
            (GradationField::ApprovedDate, TextFormat::Date),
        ]
    }
}

/// Every field of [`GradationReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradationField {
    SampleCode,
    WorkOrderCode,
    TestDate,
    PerformedBy,
    SampleType,
    MaxParticleSize,
    ParticleShape,
    GlobalWetInitialMass,
    GlobalDryMass,
    GlobalConstantDryMass,
    GlobalWashedDryMass,
    SplitWetInitialMass,
    SplitDryInitialMass,
    CoarseDryMass,
    CoarseConstantDryMass,
    FineWetMass,
    FineDryMass,
    FractionWetMass,
    FractionDryMass,
    FractionConstantDryMass,
    FractionMoisture,
    FractionWashedDryMass,
    Trial(GradationTrialField),
    MassBeforeSieving,
    MassAfterSieving,
    SievingError,
    BalanceCode,
    OvenCode,
    Notes,
    ReviewedBy,
    ReviewedDate,
    ApprovedBy,
    ApprovedDate,
}

impl ReportField for GradationField {
    fn wire_name(self) -> &'static str {
        match self {
            Self::SampleCode => "muestra",
            Self::WorkOrderCode => "numero_ot",
            Self::TestDate => "fecha_ensayo",
            Self::PerformedBy => "realizado_por",
            Self::SampleType => "tipo_muestra",
            Self::MaxParticleSize => "tamano_maximo_particula_visual_in",
            Self::ParticleShape => "forma_particula",
            Self::GlobalWetInitialMass => "masa_muestra_humeda_inicial_total_global_g",
            Self::GlobalDryMass => "masa_muestra_seca_global_g",
            Self::GlobalConstantDryMass => "masa_muestra_seca_constante_global_g",
            Self::GlobalWashedDryMass => "masa_muestra_seca_lavada_global_g",
            Self::SplitWetInitialMass => "masa_muestra_humeda_inicial_total_fraccionada_g",
            Self::SplitDryInitialMass => "masa_muestra_seca_inicial_total_fraccionada_g",
            Self::CoarseDryMass => "masa_muestra_seca_grueso_g",
            Self::CoarseConstantDryMass => "masa_muestra_seca_constante_grueso_g",
            Self::FineWetMass => "masa_muestra_humeda_fino_g",
            Self::FineDryMass => "masa_muestra_seca_fino_g",
            Self::FractionWetMass => "masa_muestra_humeda_fraccion_g",
            Self::FractionDryMass => "masa_muestra_seca_fraccion_g",
            Self::FractionConstantDryMass => "masa_muestra_seca_constante_fraccion_g",
            Self::FractionMoisture => "contenido_humedad_fraccion_pct",
            Self::FractionWashedDryMass => "masa_muestra_seca_lavada_fraccion_g",
            Self::Trial(trial) => trial.wire_name(),
            Self::MassBeforeSieving => "masa_antes_tamizado_g",
            Self::MassAfterSieving => "masa_despues_tamizado_g",
            Self::SievingError => "error_tamizado_pct",
            Self::BalanceCode => "balanza_01g_codigo",
            Self::OvenCode => "horno_codigo",
            Self::Notes => "observaciones",
            Self::ReviewedBy => "revisado_por",
            Self::ReviewedDate => "revisado_fecha",
            Self::ApprovedBy => "aprobado_por",
            Self::ApprovedDate => "aprobado_fecha",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::SampleCode => "Sample",
            Self::WorkOrderCode => "Work order",
            Self::TestDate => "Test date",
            Self::PerformedBy => "Performed by",
            Self::SampleType => "Sample type",
            Self::MaxParticleSize => "Visual max particle size (in)",
            Self::ParticleShape => "Particle shape",
            Self::GlobalWetInitialMass => "Global: initial wet mass (g)",
            Self::GlobalDryMass => "Global: dry mass (g)",
            Self::GlobalConstantDryMass => "Global: constant dry mass (g)",
            Self::GlobalWashedDryMass => "Global: washed dry mass (g)",
            Self::SplitWetInitialMass => "Split: total initial wet mass (g)",
            Self::SplitDryInitialMass => "Split: total initial dry mass (g)",
            Self::CoarseDryMass => "Split: coarse dry mass (g)",
            Self::CoarseConstantDryMass => "Split: coarse constant dry mass (g)",
            Self::FineWetMass => "Split: fine wet mass (g)",
            Self::FineDryMass => "Split: fine dry mass (g)",
            Self::FractionWetMass => "Split: fraction wet mass (g)",
            Self::FractionDryMass => "Split: fraction dry mass (g)",
            Self::FractionConstantDryMass => "Split: fraction constant dry mass (g)",
            Self::FractionMoisture => "Split: moisture content (%)",
            Self::FractionWashedDryMass => "Split: fraction washed dry mass (g)",
            Self::Trial(trial) => trial.label(),
            Self::MassBeforeSieving => "Mass before sieving (g)",
            Self::MassAfterSieving => "Mass after sieving (g)",
            Self::SievingError => "Sieving error (%)",
            Self::BalanceCode => "Balance 0.1 g",
            Self::OvenCode => "Oven",
            Self::Notes => "Notes",
            Self::ReviewedBy => "Reviewed by",
            Self::ReviewedDate => "Review date",
            Self::ApprovedBy => "Approved by",
            Self::ApprovedDate => "Approval date",
        }
    }
}

/// The repeated-reading field of [`GradationReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradationTrialField {
    RetainedMass,
}

impl ReportField for GradationTrialField {
    fn wire_name(self) -> &'static str {
        match self {
            Self::RetainedMass => "masa_retenida_tamiz_g",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::RetainedMass => "Retained mass (g)",
        }
    }
}

impl From<GradationTrialField> for GradationField {
    fn from(value: GradationTrialField) -> Self {
        GradationField::Trial(value)
    }
}
