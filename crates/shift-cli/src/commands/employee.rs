use crate::cli::GlobalFlags;
use crate::cli::subcommands::EmployeeCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `shft employee`.
pub async fn handle(
    action: &EmployeeCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        EmployeeCommands::Add { name, department } => {
            let employee = ctx.service.register_employee(name, department).await?;
            output(&employee, flags.format)
        }
        EmployeeCommands::List { department, limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.default_limit());
            let employees = ctx
                .service
                .list_employees(department.as_deref(), limit)
                .await?;
            output(&employees, flags.format)
        }
        EmployeeCommands::Get { id } => {
            let employee = ctx.service.get_employee(id).await?;
            output(&employee, flags.format)
        }
    }
}
