//! Conversion queries: a sum of quantities converted to a destination unit

use crate::error::MetricError;
use crate::quantity::Quantity;
use crate::unit::UnitId;
use crate::universe::Universe;

/// The outcome of a conversion query: the original quantities, their sum,
/// and the sum converted to the destination unit
#[derive(Debug, Clone)]
pub struct ConversionQuery {
    quantities: Vec<Quantity>,
    quantity: Quantity,
    result: Quantity,
}

impl ConversionQuery {
    /// Convert the given quantities to the destination unit, or to the base
    /// unit of the source property when no destination was named
    pub fn new(
        quantities: Vec<Quantity>,
        destination: Option<UnitId>,
        universe: &Universe,
    ) -> Result<Self, MetricError> {
        debug_assert!(!quantities.is_empty());
        let destination = match destination {
            Some(unit) => unit,
            None => {
                let source = quantities[0].unit();
                universe
                    .unit(source)
                    .property()
                    .and_then(|pid| universe.property(pid).base_unit())
                    .ok_or_else(|| {
                        MetricError::InvalidUnit(universe.unit_short_name(source))
                    })?
            }
        };
        let quantity = Quantity::sum(destination, &quantities, universe)?;
        let result = quantity.convert_to(destination, universe)?;
        Ok(Self {
            quantities,
            quantity,
            result,
        })
    }

    /// The quantities as they appeared in the query
    pub fn quantities(&self) -> &[Quantity] {
        &self.quantities
    }

    /// The sum of all quantities
    pub fn quantity(&self) -> &Quantity {
        &self.quantity
    }

    /// The sum converted to the destination unit
    pub fn result(&self) -> &Quantity {
        &self.result
    }

    /// The query's quantities: `"q1"` or `"(q1) + (q2) + …"`
    pub fn to_expression_string(&self, universe: &Universe) -> String {
        if self.quantities.len() == 1 {
            return self.quantities[0].display(universe);
        }
        let parts: Vec<String> = self
            .quantities
            .iter()
            .map(|q| q.display(universe))
            .collect();
        format!("({})", parts.join(") + ("))
    }

    /// The full result line: `"expression = value unit"`
    pub fn to_results_string(&self, universe: &Universe) -> String {
        format!(
            "{} = {}",
            self.to_expression_string(universe),
            self.result.display(universe)
        )
    }

    /// The query in its original form: `"expression in plural_unit_name"`
    pub fn to_query_string(&self, universe: &Universe) -> String {
        format!(
            "{} in {}",
            self.to_expression_string(universe),
            universe.unit_plural_name(self.result.unit())
        )
    }
}
