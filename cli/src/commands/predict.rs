use diasys_cli::{OutputFormatter, Result};
use diasys_link::{DiasysApi, PredictRequest, SessionManager, TokenStore};

use crate::args::PredictArgs;

impl From<&PredictArgs> for PredictRequest {
    fn from(args: &PredictArgs) -> Self {
        PredictRequest::new(args.glucose, args.blood_pressure, args.weight, args.height, args.age)
            .with_insulin(args.insulin)
            .with_skin_thickness(args.skin_thickness)
            .with_diabetes_pedigree_function(args.diabetes_pedigree)
            .with_pregnancies(args.pregnancies)
    }
}

pub async fn handle_predict<A: DiasysApi, S: TokenStore>(
    session: &SessionManager<A, S>,
    args: &PredictArgs,
    formatter: &OutputFormatter,
) -> Result<()> {
    let request = PredictRequest::from(args);
    let result = session.predict(&request).await?;
    println!("{}", formatter.format_prediction(&result)?);
    Ok(())
}
